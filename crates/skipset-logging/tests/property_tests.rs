//! Property tests for skipset-logging

use proptest::prelude::*;
use skipset_logging::{LogCollector, LogEntry, LogLevel, Logger, LoggingConfig};

fn strategy_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Off),
        Just(LogLevel::Error),
        Just(LogLevel::Warn),
        Just(LogLevel::Info),
        Just(LogLevel::Debug),
        Just(LogLevel::Trace),
    ]
}

proptest! {
    /// The collector never exceeds its capacity and keeps the newest entries.
    #[test]
    fn prop_collector_bounded(capacity in 0usize..16, pushes in 0usize..64) {
        let mut collector = LogCollector::with_capacity(capacity);
        for i in 0..pushes {
            collector.push(LogEntry::new(LogLevel::Info, format!("m{i}")));
        }
        prop_assert_eq!(collector.len(), pushes.min(capacity));
        prop_assert_eq!(collector.dropped(), pushes - collector.len());
        if let Some(last) = collector.entries().last() {
            prop_assert_eq!(last.message.clone(), format!("m{}", pushes - 1));
        }
    }

    /// A logger records an entry exactly when the threshold admits it.
    #[test]
    fn prop_logger_respects_threshold(threshold in strategy_level(), level in strategy_level()) {
        let mut logger = Logger::new(LoggingConfig::new().with_level(threshold));
        logger.log(level, "skipset::insert", "event", |e| e);
        prop_assert_eq!(logger.collector().len() == 1, threshold.should_log(level));
    }

    /// Component overrides win over the global level.
    #[test]
    fn prop_component_override(global in strategy_level(), local in strategy_level(), level in strategy_level()) {
        let config = LoggingConfig::new()
            .with_level(global)
            .with_component_level("skipset::rebalance", local);
        prop_assert_eq!(
            config.should_log(level, Some("skipset::rebalance")),
            local.should_log(level)
        );
        prop_assert_eq!(config.should_log(level, Some("skipset::clear")), global.should_log(level));
    }
}
