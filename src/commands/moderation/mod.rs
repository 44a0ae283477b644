
pub mod nuke_safe;
pub mod raid_sim;
pub mod auto_ping;
pub mod ghost_ping_detector;
