//! Contracts and implementations wired by the generated containers.
//!
//! This file is also scanned at build time for constructor signatures.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Number of `ExpensiveClock` constructions so far.
pub static CLOCK_CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

static CONNECTION_FAILED: AtomicBool = AtomicBool::new(false);

fn next_id() -> usize {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

pub trait Foo: Send + Sync {
    /// The realized object graph, e.g. `FooClass(BarOne(), BazOne())`.
    fn describe(&self) -> String;
    fn bar(&self) -> &Arc<dyn Bar>;
    fn baz(&self) -> &Arc<dyn Baz>;
}

pub trait Bar: Send + Sync {
    fn describe(&self) -> String;
    fn id(&self) -> usize;
}

pub trait Baz: Send + Sync {
    fn describe(&self) -> String;
    fn id(&self) -> usize;
}

pub struct FooClass {
    bar: Arc<dyn Bar>,
    baz: Arc<dyn Baz>,
}

impl FooClass {
    pub fn new(bar: Arc<dyn Bar>, baz: Arc<dyn Baz>) -> Self {
        Self { bar, baz }
    }
}

impl Foo for FooClass {
    fn describe(&self) -> String {
        format!("FooClass({}, {})", self.bar.describe(), self.baz.describe())
    }

    fn bar(&self) -> &Arc<dyn Bar> {
        &self.bar
    }

    fn baz(&self) -> &Arc<dyn Baz> {
        &self.baz
    }
}

macro_rules! leaf {
    ($name:ident: $contract:ident) => {
        pub struct $name {
            id: usize,
        }

        impl $name {
            pub fn new() -> Self {
                Self { id: next_id() }
            }
        }

        impl $contract for $name {
            fn describe(&self) -> String {
                concat!(stringify!($name), "()").to_string()
            }

            fn id(&self) -> usize {
                self.id
            }
        }
    };
}

leaf!(BarOne: Bar);
leaf!(BarTwo: Bar);
leaf!(BazOne: Baz);
leaf!(BazTwo: Baz);

pub trait Logger: Send + Sync {
    fn format(&self, message: &str) -> String;
}

pub struct ConsoleLogger;

impl ConsoleLogger {
    pub fn new() -> Self {
        ConsoleLogger
    }
}

impl Logger for ConsoleLogger {
    fn format(&self, message: &str) -> String {
        format!("[console] {message}")
    }
}

pub trait Clock: Send + Sync {
    fn ticks(&self) -> u64;
}

/// Slow to build; counts its constructions.
pub struct ExpensiveClock {
    started: u64,
}

impl ExpensiveClock {
    pub fn new() -> Self {
        CLOCK_CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(25));
        Self { started: 42 }
    }
}

impl Clock for ExpensiveClock {
    fn ticks(&self) -> u64 {
        self.started
    }
}

pub trait Connection: Send + Sync {
    fn attempt(&self) -> usize;
}

/// Panics the first time it is constructed in the process.
pub struct FlakyConnection {
    attempt: usize,
}

impl FlakyConnection {
    pub fn new() -> Self {
        if !CONNECTION_FAILED.swap(true, Ordering::SeqCst) {
            panic!("connection refused");
        }
        Self { attempt: 2 }
    }
}

impl Connection for FlakyConnection {
    fn attempt(&self) -> usize {
        self.attempt
    }
}

pub trait Handler: Send + Sync {
    fn handle(&self, request: &str) -> String;
    fn clock(&self) -> &Arc<dyn Clock>;
}

pub struct RequestHandler {
    clock: Arc<dyn Clock>,
    logger: Arc<dyn Logger>,
}

impl RequestHandler {
    pub fn new(clock: Arc<dyn Clock>, logger: Arc<dyn Logger>) -> Self {
        Self { clock, logger }
    }
}

impl Handler for RequestHandler {
    fn handle(&self, request: &str) -> String {
        self.logger.format(&format!("{request} @ {}", self.clock.ticks()))
    }

    fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

/// Concrete contract; tests watch it through `Weak` to observe release.
pub struct Tracker {
    pub id: usize,
}

impl Tracker {
    pub fn new() -> Self {
        Self { id: next_id() }
    }
}
