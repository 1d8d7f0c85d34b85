// ── Chaos rule screen ──
//
// Fault-injection rule management. Not polled: rules change only
// through this screen, so state is loaded on activation and re-fetched
// after each successful mutation.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use opsdeck_core::ErrorKind;

use crate::api::ChaosApi;
use crate::model::{CanaryConfig, ChaosRule};

pub struct ChaosScreen<C: ChaosApi> {
    client: Arc<C>,
    rules: watch::Sender<Arc<BTreeMap<String, ChaosRule>>>,
    canary: watch::Sender<Option<CanaryConfig>>,
}

impl<C: ChaosApi> ChaosScreen<C> {
    pub fn new(client: C) -> Self {
        let (rules, _) = watch::channel(Arc::new(BTreeMap::new()));
        let (canary, _) = watch::channel(None);
        Self {
            client: Arc::new(client),
            rules,
            canary,
        }
    }

    /// Load the per-topic rule map.
    pub async fn refresh_rules(&self) -> Result<(), ErrorKind> {
        let rules = self.client.rules().await?;
        self.rules.send_modify(|r| *r = Arc::new(rules));
        Ok(())
    }

    pub fn rules(&self) -> watch::Receiver<Arc<BTreeMap<String, ChaosRule>>> {
        self.rules.subscribe()
    }

    pub fn rules_snapshot(&self) -> Arc<BTreeMap<String, ChaosRule>> {
        self.rules.borrow().clone()
    }

    /// Create or update the rule for `topic`, then re-fetch the map.
    /// Fire-once: a failed mutation surfaces and nothing is re-fetched.
    pub async fn upsert_rule(&self, topic: &str, rule: ChaosRule) -> Result<ChaosRule, ErrorKind> {
        let stored = self.client.put_rule(topic, rule).await?;
        self.refresh_rules().await?;
        Ok(stored)
    }

    pub async fn remove_rule(&self, topic: &str) -> Result<(), ErrorKind> {
        self.client.delete_rule(topic).await?;
        self.refresh_rules().await
    }

    pub async fn clear_rules(&self) -> Result<(), ErrorKind> {
        self.client.clear_rules().await?;
        self.refresh_rules().await
    }

    /// Load the canary flag. A failure leaves the last known state in
    /// place and surfaces to the caller.
    pub async fn refresh_canary(&self) -> Result<CanaryConfig, ErrorKind> {
        let config = self.client.canary().await?;
        self.canary.send_modify(|c| *c = Some(config));
        Ok(config)
    }

    pub fn canary(&self) -> Option<CanaryConfig> {
        *self.canary.borrow()
    }

    /// Flip the canary. Published only once the backend confirms -- a
    /// failed toggle never flips the local flag.
    pub async fn set_canary(&self, enabled: bool, percentage: f64) -> Result<CanaryConfig, ErrorKind> {
        let config = self
            .client
            .set_canary(CanaryConfig {
                enabled,
                percentage,
            })
            .await?;
        debug!(enabled = config.enabled, "canary toggled");
        self.canary.send_modify(|c| *c = Some(config));
        Ok(config)
    }
}
