use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config, Root},
};

/// Console logging for integration tests. Safe to call from every test;
/// only the first initialization wins.
pub fn init_default_logging() {
    let stdout = ConsoleAppender::builder().build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(
            Root::builder()
                .appender("stdout")
                .build(LevelFilter::Debug),
        )
        .expect("valid logging config");
    let _ = log4rs::init_config(config);
}
