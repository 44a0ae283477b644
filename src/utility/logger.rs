
use colored::*;
use chrono::Local;

use std::fmt::Display;


pub enum Level {
    #[allow(unused)]
    Debug,
    Info,
    Warn,
    Error,
}

pub struct Logger {}

impl Logger {

    fn log(level: Level, label: &str, content: Option<&str>) {
        let prefix = match level {
            Level::Debug => "DEBUG".truecolor(120, 120, 255),
            Level::Info  => "INFO".green(),
            Level::Warn  => "WARN".truecolor(255, 130, 0),
            Level::Error => "ERROR".truecolor(255, 20, 0),
        };
        let time = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let content = match content {
            Some(content) => format!("{}: {}", label.truecolor(140, 140, 140), content),
            None          => label.to_string()
        };
        match level {
            Level::Warn | Level::Error => eprintln!("{} [{}] {}", time.dimmed(), prefix, content),
            _                          => println!("{} [{}] {}", time.dimmed(), prefix, content),
        }
    }

    #[allow(unused)]
    pub fn debug(label: &str) {
        #[cfg(feature = "debug")]
        Logger::log(Level::Debug, label, None);
    }

    #[allow(unused)]
    pub fn info(label: &str) {
        Logger::log(Level::Info, label, None);
    }

    #[allow(unused)]
    pub fn warn(label: &str) {
        Logger::log(Level::Warn, label, None);
    }

    #[allow(unused)]
    pub fn err(label: &str) {
        Logger::log(Level::Error, label, None);
    }

    #[allow(unused)]
    pub fn info_long(label: &str, content: &str) {
        Logger::log(Level::Info, label, Some(content));
    }

    #[allow(unused)]
    pub fn warn_long(label: &str, content: &str) {
        Logger::log(Level::Warn, label, Some(content));
    }

    #[allow(unused)]
    pub fn err_long(label: &str, content: &str) {
        Logger::log(Level::Error, label, Some(content));
    }

    /// Logs a failure that the caller deliberately does not propagate.
    pub fn swallowed(label: &str, error: impl Display) {
        Logger::warn_long(label, &error.to_string());
    }

}
