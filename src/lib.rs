pub mod cfbd_fetch;
pub mod config;
pub mod demo;
pub mod feed;
pub mod fields;
pub mod http_client;
pub mod lines;
pub mod model;
pub mod odds_fetch;
pub mod rank_talent;
pub mod scoring;
pub mod server;
pub mod slate;
pub mod state;
pub mod weights;
pub mod window;
