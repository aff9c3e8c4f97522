pub mod admin_auth;
pub mod not_banned;
pub mod request_id;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test_session;
