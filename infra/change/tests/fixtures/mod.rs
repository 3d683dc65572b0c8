#![allow(dead_code)]

use beans_change::{
    ExceptionListener, PropertyChangeEvent, PropertyChangeListener, PropertyVetoError,
    VetoableChangeListener,
};
use parking_lot::Mutex;
use std::error::Error;
use std::sync::Arc;

/// One observed listener invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub listener: &'static str,
    pub event: PropertyChangeEvent,
}

/// Shared, ordered record of every listener invocation in a test.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn record(&self, listener: &'static str, event: &PropertyChangeEvent) {
        self.0.lock().push(Call { listener, event: event.clone() });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.lock().iter().map(|c| c.listener).collect()
    }

    pub fn events_for(&self, listener: &str) -> Vec<PropertyChangeEvent> {
        self.0.lock().iter().filter(|c| c.listener == listener).map(|c| c.event.clone()).collect()
    }
}

/// Vetoable listener that accepts everything.
#[derive(Debug)]
pub struct Acceptor {
    pub name: &'static str,
    pub log: CallLog,
}

impl VetoableChangeListener for Acceptor {
    fn vetoable_change(&self, event: &PropertyChangeEvent) -> Result<(), PropertyVetoError> {
        self.log.record(self.name, event);
        Ok(())
    }
}

/// Vetoable listener that rejects everything with the event it was given.
#[derive(Debug)]
pub struct Vetoer {
    pub name: &'static str,
    pub log: CallLog,
}

impl VetoableChangeListener for Vetoer {
    fn vetoable_change(&self, event: &PropertyChangeEvent) -> Result<(), PropertyVetoError> {
        self.log.record(self.name, event);
        Err(PropertyVetoError::new(format!("{} refuses", self.name), event.clone()))
    }
}

/// Bound listener that only records.
#[derive(Debug)]
pub struct Observer {
    pub name: &'static str,
    pub log: CallLog,
}

impl PropertyChangeListener for Observer {
    fn property_change(&self, event: &PropertyChangeEvent) {
        self.log.record(self.name, event);
    }
}

/// Collects the rendered message of every recovered failure.
#[derive(Debug, Clone, Default)]
pub struct ErrorSink(Arc<Mutex<Vec<String>>>);

impl ErrorSink {
    pub fn messages(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

impl ExceptionListener for ErrorSink {
    fn exception_thrown(&self, error: &(dyn Error + 'static)) {
        self.0.lock().push(error.to_string());
    }
}

pub fn acceptor(name: &'static str, log: &CallLog) -> Arc<dyn VetoableChangeListener> {
    Arc::new(Acceptor { name, log: log.clone() })
}

pub fn vetoer(name: &'static str, log: &CallLog) -> Arc<dyn VetoableChangeListener> {
    Arc::new(Vetoer { name, log: log.clone() })
}

pub fn observer(name: &'static str, log: &CallLog) -> Arc<dyn PropertyChangeListener> {
    Arc::new(Observer { name, log: log.clone() })
}
