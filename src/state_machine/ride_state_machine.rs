use std::time::Duration;
use tracing::{debug, info};

use super::{
    errors::{StateMachineError, StateMachineResult},
    events::RideEvent,
    states::RideState,
};
use crate::config::RideConfig;

/// Per-bicycle ride lifecycle: `Idle <-> Riding`, `* -> Servicing -> Idle`
#[derive(Debug)]
pub struct RideStateMachine {
    brand: String,
    state: RideState,
    start_delay: Duration,
    stop_delay: Duration,
    service_delay: Duration,
}

impl RideStateMachine {
    pub fn new(brand: impl Into<String>, config: &RideConfig) -> Self {
        Self {
            brand: brand.into(),
            state: RideState::Idle,
            start_delay: Duration::from_millis(config.start_ms),
            stop_delay: Duration::from_millis(config.stop_ms),
            service_delay: Duration::from_millis(config.service_ms),
        }
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn current_state(&self) -> RideState {
        self.state
    }

    /// `Idle -> Riding`; the state changes before the ride delay
    pub async fn start_riding(&mut self) -> StateMachineResult<RideState> {
        self.guard(RideEvent::StartRiding, self.state == RideState::Idle)?;

        info!(brand = %self.brand, "Starting ride");
        self.state = RideState::Riding;
        tokio::time::sleep(self.start_delay).await;
        debug!(brand = %self.brand, state = %self.state, "Ride underway");

        Ok(self.state)
    }

    /// `Riding -> Idle` after the stop delay
    pub async fn stop(&mut self) -> StateMachineResult<RideState> {
        self.guard(RideEvent::Stop, self.state == RideState::Riding)?;

        info!(brand = %self.brand, "Stopping");
        tokio::time::sleep(self.stop_delay).await;
        self.state = RideState::Idle;
        debug!(brand = %self.brand, state = %self.state, "Stopped");

        Ok(self.state)
    }

    /// `Idle | Riding -> Servicing -> Idle`
    pub async fn service(&mut self) -> StateMachineResult<RideState> {
        self.guard(RideEvent::Service, self.state != RideState::Servicing)?;

        info!(brand = %self.brand, "Service started");
        self.state = RideState::Servicing;
        tokio::time::sleep(self.service_delay).await;
        self.state = RideState::Idle;
        info!(brand = %self.brand, state = %self.state, "Service finished");

        Ok(self.state)
    }

    fn guard(&self, event: RideEvent, allowed: bool) -> StateMachineResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(StateMachineError::InvalidTransition {
                from: self.state.to_string(),
                event: event.event_type().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> RideStateMachine {
        RideStateMachine::new("SpecialBike", &RideConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_ride_then_service_then_stop_sequence() {
        let mut bike = machine();

        assert_eq!(bike.start_riding().await, Ok(RideState::Riding));
        // Servicing is allowed mid-ride and returns the bike to idle
        assert_eq!(bike.service().await, Ok(RideState::Idle));
        // Stopping from idle is rejected and leaves the state alone
        assert!(bike.stop().await.is_err());
        assert_eq!(bike.current_state(), RideState::Idle);
        assert_eq!(bike.service().await, Ok(RideState::Idle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_riding_twice_is_rejected() {
        let mut bike = machine();
        bike.start_riding().await.unwrap();

        let err = bike.start_riding().await.unwrap_err();
        assert_eq!(
            err,
            StateMachineError::InvalidTransition {
                from: "riding".to_string(),
                event: "start_riding".to_string(),
            }
        );
        assert_eq!(bike.stop().await, Ok(RideState::Idle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_service_waits_configured_delay() {
        let mut bike = machine();
        let started = tokio::time::Instant::now();
        bike.service().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert_eq!(bike.current_state(), RideState::Idle);
    }
}
