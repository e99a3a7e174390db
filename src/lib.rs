// OneHand Core Library
// Copyright (c) 2026 Xing_The_Creator | OneHand

pub mod config;
pub mod downloader;
pub mod explorer;
pub mod geotag;
pub mod names;
pub mod stage;
