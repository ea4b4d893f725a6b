//! Host-platform discovery manifest
//!
//! The same descriptor the web distribution serves at
//! `/.well-known/farcaster.json`, emitted as plain JSON for hosts that
//! sideload the app.

use serde::Serialize;

pub const APP_NAME: &str = "Coinfolio";
pub const DEFAULT_APP_URL: &str = "https://coinfolio.app";

/// Static app descriptor for host-platform discovery
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    pub name: String,
    pub icon_url: String,
    pub home_url: String,
    pub image_url: String,
    pub button_title: String,
    pub splash_image_url: String,
    pub splash_background_color: String,
    pub primary_category: String,
}

/// Build the descriptor for the given deployment URL
pub fn manifest(app_url: &str) -> Manifest {
    let app_url = app_url.trim_end_matches('/');
    Manifest {
        version: "1".to_string(),
        name: APP_NAME.to_string(),
        icon_url: format!("{}/icon.png", app_url),
        home_url: app_url.to_string(),
        image_url: format!("{}/opengraph-image.png", app_url),
        button_title: "Open".to_string(),
        splash_image_url: format!("{}/splash.png", app_url),
        splash_background_color: "#f7f7f7".to_string(),
        primary_category: "finance".to_string(),
    }
}
