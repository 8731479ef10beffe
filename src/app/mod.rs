pub mod application;
pub mod aws;
pub mod aws_auth;
pub mod cli;
pub mod kubectl;
pub mod logging;
pub mod manifest;
pub mod patcher;
pub mod runner;
