//! This binary serves the Min Renovasjon pickup calendar of one address.
//!
//! See [`route::calendar`] for the routes.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{routing::get, Router};
use clap::Parser;
use log::info;
use mrc_core::{
    calendar::{CalendarConfig, WasteCalendar},
    min_renovasjon::{Address, MinRenovasjon},
};

use crate::config::Config;

mod config;
mod route;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let config = Config::parse();
    let source = MinRenovasjon::with_proxy_url(Address::from(&config), config.proxy_url.clone());
    let calendar = Arc::new(WasteCalendar::new(
        source,
        CalendarConfig::new(config.entry_id.clone(), config.timezone),
    ));
    let refreshed = calendar.clone();
    let refresh_period = Duration::from_secs(config.refresh_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_period);
        loop {
            interval.tick().await;
            refreshed.update().await;
        }
    });
    let app = Router::new()
        .route("/calendar", get(route::calendar::handler))
        .route("/calendar/events", get(route::calendar::events::handler))
        .route("/calendar/next", get(route::calendar::next::handler))
        .route("/calendar/info", get(route::calendar::info::handler))
        .with_state(calendar);
    info!("listening on {}", config.bind);
    axum::Server::bind(&config.bind)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
