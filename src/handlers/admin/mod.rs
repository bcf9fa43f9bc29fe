pub mod moderation;
pub mod payouts;
pub mod placements;
pub mod settings;
pub mod stats;
