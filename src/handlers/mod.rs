// Handlers are grouped by access tier: public (no identity required),
// protected (valid session token), admin (session plus the admin role).
pub mod admin;
pub mod protected;
pub mod public;
