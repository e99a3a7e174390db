// OneHand Location Maps
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Self-contained Leaflet pages with one marker per located photo.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

pub const SINGLE_MAP_FILE: &str = "location_map.html";
pub const MASTER_MAP_FILE: &str = "master_map.html";

const SINGLE_ZOOM: u8 = 15;
const BATCH_ZOOM: u8 = 10;

/// Marker colours, cycled per photo.
const COLORS: [&str; 10] = [
    "red", "blue", "green", "purple", "orange", "darkred", "darkblue", "darkgreen", "cadetblue", "black",
];

/// One photo on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPin {
    pub filename: String,
    pub camera: String,
    pub date: String,
    pub time: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

pub fn google_maps_url(latitude: f64, longitude: f64) -> String {
    format!("https://www.google.com/maps?q={},{}", latitude, longitude)
}

/// Page centred on the mean position of `pins`. `None` for an empty list.
pub fn render_map(pins: &[MapPin]) -> Option<String> {
    if pins.is_empty() {
        return None;
    }

    let count = pins.len() as f64;
    let center_lat = pins.iter().map(|p| p.latitude).sum::<f64>() / count;
    let center_lon = pins.iter().map(|p| p.longitude).sum::<f64>() / count;
    let zoom = if pins.len() == 1 { SINGLE_ZOOM } else { BATCH_ZOOM };

    // `</` would close the script block early.
    let data = serde_json::to_string(pins).ok()?.replace("</", "<\\/");
    let colors = serde_json::to_string(&COLORS).ok()?;

    Some(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Saan Ka Talaga?</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const pins = {data};
const colors = {colors};
const map = L.map("map").setView([{center_lat}, {center_lon}], {zoom});
L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
const esc = (s) => String(s).replace(/[&<>"']/g, (c) => "&#" + c.charCodeAt(0) + ";");
pins.forEach((p, i) => {{
  const popup = `<div style="font-family: Arial; width: 250px;">
    <h4>📍 Photo #${{i + 1}}</h4>
    <b>📸 File:</b> ${{esc(p.filename)}}<br>
    <b>📅 Date:</b> ${{esc(p.date)}}<br>
    <b>⏰ Time:</b> ${{esc(p.time)}}<br>
    <b>📷 Camera:</b> ${{esc(p.camera)}}<br>
    <b>📍 Address:</b> ${{esc(p.address)}}<br>
  </div>`;
  L.circleMarker([p.latitude, p.longitude], {{ color: colors[i % colors.length], radius: 9 }})
    .bindTooltip(`Photo ${{i + 1}}: ${{esc(p.filename)}}`)
    .bindPopup(popup)
    .addTo(map);
}});
</script>
</body>
</html>
"#
    ))
}

/// Write the map for `pins` to `dir/file_name` and return the path.
pub fn write_map(dir: &Path, file_name: &str, pins: &[MapPin]) -> Result<Option<PathBuf>> {
    let Some(html) = render_map(pins) else {
        return Ok(None);
    };

    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let path = dir.join(file_name);
    std::fs::write(&path, html).with_context(|| format!("Failed to write map {:?}", path))?;
    Ok(Some(path))
}
