//! Test support: global tracing subscriber and sample trees

use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Attribute, CompositeNode};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    // Create a filter for noisy modules
    let noisy_modules = ["config", "serde"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // RUST_LOG wins, otherwise debug for this crate only
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dagnode=debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Four node tree used across tests:
///
/// ```text
/// |----MyNodeA
///     |----MyNodeB          attributeA = 1, attributeB = 3
///         |----MyNodeD      attributeA = 2
///     |----MyNodeC          attributeA = 0
/// ```
///
/// Returns `(a, b, c, d)`.
pub fn sample_tree() -> (CompositeNode, CompositeNode, CompositeNode, CompositeNode) {
    let a = CompositeNode::named("MyNodeA");
    let b = CompositeNode::builder()
        .name("MyNodeB")
        .attribute("attributeA", Attribute::with_value(1))
        .attribute("attributeB", Attribute::with_value(3))
        .parent(&a)
        .build();
    let c = CompositeNode::builder()
        .name("MyNodeC")
        .attribute("attributeA", Attribute::with_value(0))
        .parent(&a)
        .build();
    let d = CompositeNode::builder()
        .name("MyNodeD")
        .attribute("attributeA", Attribute::with_value(2))
        .parent(&b)
        .build();
    (a, b, c, d)
}
