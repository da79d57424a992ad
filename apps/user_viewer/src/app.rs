//! Wires settings, the user view model and the terminal card together.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use client_core::{
    FetchCoordinator, HttpUserService, MissingUserService, PumpReport, StalePolicy,
    UserFetchService,
};
use shared::display::DisplayPayload;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::{
    avatar::HttpAvatarLoader,
    config::Settings,
    view::UserCardView,
};

/// Extra time granted to the pump on top of the request timeout.
const DELIVERY_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub discard_stale: bool,
    pub skip_avatar: bool,
}

pub struct CardRun {
    pub view: Arc<UserCardView>,
    pub payloads: Vec<DisplayPayload>,
    pub report: PumpReport,
}

pub fn build_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build fetch runtime")
}

pub fn user_service(settings: &Settings) -> Arc<dyn UserFetchService> {
    match HttpUserService::new(settings.service_options()) {
        Ok(service) => {
            info!(endpoint = %service.endpoint(), "using user endpoint");
            Arc::new(service)
        }
        Err(err) => {
            warn!("user endpoint unusable, the card will show the fallback: {err}");
            Arc::new(MissingUserService)
        }
    }
}

/// Fetches once, waits for the result on this thread and resolves the avatar.
pub fn run_card(runtime: &Runtime, settings: &Settings, options: RunOptions) -> CardRun {
    let stale_policy = if options.discard_stale {
        StalePolicy::DiscardStale
    } else {
        StalePolicy::DeliverAll
    };
    let mut coordinator = FetchCoordinator::new(user_service(settings), runtime.handle().clone())
        .with_stale_policy(stale_policy);

    let view = Arc::new(UserCardView::default());
    coordinator.register_output(&view);
    let mut subscription = coordinator.subscribe();

    coordinator.fetch_user();
    let report = coordinator.pump_until_idle(settings.request_timeout() + DELIVERY_GRACE);
    if report.delivered == 0 {
        warn!(in_flight = coordinator.in_flight(), "no user update arrived before the deadline");
    }

    if !options.skip_avatar {
        match HttpAvatarLoader::new(settings.request_timeout()) {
            Ok(loader) => view.resolve_avatar(runtime, &loader),
            Err(err) => warn!("skipping avatar: {err}"),
        }
    }

    let mut payloads = Vec::new();
    while let Ok(payload) = subscription.try_recv() {
        payloads.push(payload);
    }

    CardRun {
        view,
        payloads,
        report,
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
