
use tokio::sync::Mutex;

use std::sync::Arc;

use crate::utility::*;


/// Everything the event handlers share, cheap to clone.
#[derive(Clone)]
pub struct BotState {
    pub config: Arc<Config>,
    pub platform: Arc<dyn ChatPlatform>,
    pub detector: GhostPingDetector,
    pub broadcaster: Arc<Mutex<Broadcaster>>,
}

impl BotState {

    pub fn new(config: Config, platform: Arc<dyn ChatPlatform>) -> BotState {
        BotState {
            config: Arc::new(config),
            broadcaster: Arc::new(Mutex::new(Broadcaster::new(Arc::clone(&platform)))),
            detector: GhostPingDetector::new(),
            platform,
        }
    }

}
