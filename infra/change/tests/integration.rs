pub mod fixtures;

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use beans_change::*;
    use beans_domain::config::{ChangeConfig, DuplicatePolicy, VetoEventPolicy};
    use beans_domain::value::Value;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn event(old: i64, new: i64) -> PropertyChangeEvent {
        PropertyChangeEvent::new("bean:test".into(), "x", old, new)
    }

    #[test]
    fn test_veto_short_circuits_later_listeners() {
        let log = CallLog::default();
        let support = ChangeSupport::new("bean:test");
        support.add_vetoable_change_listener(acceptor("l1", &log));
        support.add_vetoable_change_listener(vetoer("l2", &log));
        support.add_vetoable_change_listener(acceptor("l3", &log));

        let veto = support.fire_vetoable_change("x", 1, 2).unwrap_err();

        assert!(!log.names().contains(&"l3"), "listeners after the vetoer must not run");
        assert_eq!(veto.event(), &event(1, 2));
        assert_eq!(log.events_for("l1")[0], event(1, 2));
        assert_eq!(log.events_for("l2"), vec![event(1, 2)]);
        assert_eq!(veto.message(), "l2 refuses");
    }

    #[test]
    fn test_accepting_listeners_are_shown_the_revert() {
        let log = CallLog::default();
        let support = ChangeSupport::new("bean:test");
        support.add_vetoable_change_listener(acceptor("l1", &log));
        support.add_vetoable_change_listener(vetoer("l2", &log));

        let _ = support.fire_vetoable_change("x", 1, 2);

        assert_eq!(log.names(), ["l1", "l2", "l1"]);
        assert_eq!(log.events_for("l1"), vec![event(1, 2), event(2, 1)]);
    }

    #[test]
    fn test_revert_can_be_disabled() {
        let log = CallLog::default();
        let config = ChangeConfig { revert_on_veto: false, ..ChangeConfig::default() };
        let support = ChangeSupport::with_config("bean:test", config);
        support.add_vetoable_change_listener(acceptor("l1", &log));
        support.add_vetoable_change_listener(vetoer("l2", &log));

        let _ = support.fire_vetoable_change("x", 1, 2);

        assert_eq!(log.names(), ["l1", "l2"]);
    }

    #[test]
    fn test_veto_during_revert_is_reported_not_raised() {
        let log = CallLog::default();
        let errors = ErrorSink::default();
        let support = ChangeSupport::new("bean:test");
        support.add_exception_listener(Arc::new(errors.clone()));

        // Accepts 1 -> 2 but refuses to go back.
        support.add_vetoable_change_listener(Arc::new(|e: &PropertyChangeEvent| {
            if e.new_value() == &Value::Int(1) {
                Err(PropertyVetoError::new("no going back", e.clone()))
            } else {
                Ok(())
            }
        }));
        support.add_vetoable_change_listener(vetoer("l2", &log));

        let veto = support.fire_vetoable_change("x", 1, 2).unwrap_err();

        assert_eq!(veto.event(), &event(1, 2));
        assert_eq!(veto.message(), "l2 refuses");
        let messages = errors.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Revert vetoed"), "unexpected report: {}", messages[0]);
    }

    #[test]
    fn test_scenario_accept_then_veto_keeps_old_value() {
        let log = CallLog::default();
        let support = ChangeSupport::new("bean:test");
        support.add_vetoable_change_listener(acceptor("a", &log));
        support.add_vetoable_change_listener(vetoer("b", &log));

        let x = Constrained::new("x", 1_i64);
        let veto = x.set(&support, 2).unwrap_err();

        assert_eq!(veto.event().property_name(), Some("x"));
        assert_eq!(veto.event().old_value(), &Value::Int(1));
        assert_eq!(veto.event().new_value(), &Value::Int(2));
        assert_eq!(x.get(), 1);
    }

    #[test]
    fn test_scenario_all_accept_commits_and_notifies() {
        let log = CallLog::default();
        let support = ChangeSupport::new("bean:test");
        support.add_vetoable_change_listener(acceptor("a", &log));
        support.add_vetoable_change_listener(acceptor("b", &log));
        support.add_property_change_listener(observer("info1", &log));
        support.add_property_change_listener(observer("info2", &log));

        let x = Constrained::new("x", 1_i64);
        x.set(&support, 2).unwrap();

        assert_eq!(x.get(), 2);
        assert_eq!(log.names(), ["a", "b", "info1", "info2"]);
        assert_eq!(log.events_for("info1"), vec![event(1, 2)]);
        assert_eq!(log.events_for("info2"), vec![event(1, 2)]);
    }

    #[test]
    fn test_value_is_committed_before_bound_listeners_run() {
        let support = ChangeSupport::new("bean:test");
        let x = Arc::new(Constrained::new("x", 1_i64));
        let seen = Arc::new(Mutex::new(None));

        let (cell, slot) = (Arc::clone(&x), Arc::clone(&seen));
        support.add_property_change_listener(Arc::new(move |_: &PropertyChangeEvent| {
            *slot.lock() = Some(cell.get());
        }));

        x.set(&support, 7).unwrap();
        assert_eq!(*seen.lock(), Some(7));
    }

    #[test]
    fn test_value_is_not_applied_while_proposed() {
        let support = ChangeSupport::new("bean:test");
        let x = Arc::new(Constrained::new("x", 1_i64));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let (cell, slot) = (Arc::clone(&x), Arc::clone(&seen));
        support.add_vetoable_change_listener(Arc::new(move |_: &PropertyChangeEvent| {
            slot.lock().push(cell.get());
            Ok::<(), PropertyVetoError>(())
        }));

        x.set(&support, 2).unwrap();
        assert_eq!(*seen.lock(), vec![1]);
    }

    #[test]
    fn test_event_fidelity_across_listeners() {
        let log = CallLog::default();
        let support = ChangeSupport::new("bean:test");
        for name in ["v1", "v2", "v3"] {
            support.add_vetoable_change_listener(acceptor(name, &log));
        }
        support.add_property_change_listener(observer("p1", &log));

        support.apply_vetoable("x", 3, 4, || {}).unwrap();

        let calls = log.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|c| c.event == event(3, 4)));
        assert!(calls.iter().all(|c| c.event.source().as_str() == "bean:test"));
    }

    #[test]
    fn test_listener_removing_itself_mid_dispatch() {
        struct SelfRemoving {
            support: Arc<ChangeSupport>,
            me: Mutex<Option<Arc<dyn VetoableChangeListener>>>,
            log: CallLog,
        }

        impl VetoableChangeListener for SelfRemoving {
            fn vetoable_change(&self, event: &PropertyChangeEvent) -> Result<(), PropertyVetoError> {
                self.log.record("self", event);
                if let Some(me) = self.me.lock().take() {
                    assert!(self.support.remove_vetoable_change_listener(&me));
                }
                Ok(())
            }
        }

        let log = CallLog::default();
        let support = Arc::new(ChangeSupport::new("bean:test"));
        let listener = Arc::new(SelfRemoving {
            support: Arc::clone(&support),
            me: Mutex::new(None),
            log: log.clone(),
        });
        let handle: Arc<dyn VetoableChangeListener> = listener.clone();
        *listener.me.lock() = Some(Arc::clone(&handle));

        support.add_vetoable_change_listener(handle);
        support.add_vetoable_change_listener(acceptor("after", &log));

        support.fire_vetoable_change("x", 1, 2).unwrap();
        assert_eq!(log.names(), ["self", "after"], "the in-flight round keeps its snapshot");

        support.fire_vetoable_change("x", 2, 3).unwrap();
        assert_eq!(log.names(), ["self", "after", "after"]);
        assert_eq!(support.vetoable_change_listener_count(), 1);
    }

    #[test]
    fn test_listener_added_mid_dispatch_waits_for_next_round() {
        let log = CallLog::default();
        let support = Arc::new(ChangeSupport::new("bean:test"));

        let (host, late_log) = (Arc::clone(&support), log.clone());
        let added = Arc::new(Mutex::new(false));
        support.add_property_change_listener(Arc::new(move |_: &PropertyChangeEvent| {
            let mut added = added.lock();
            if !*added {
                host.add_property_change_listener(observer("late", &late_log));
                *added = true;
            }
        }));

        support.fire_property_change("x", 1, 2);
        assert!(log.names().is_empty());

        support.fire_property_change("x", 2, 3);
        assert_eq!(log.names(), ["late"]);
    }

    #[test]
    fn test_duplicate_registration_policies() {
        let log = CallLog::default();
        let listener = acceptor("dup", &log);

        let per_registration = ChangeSupport::new("bean:test");
        assert!(per_registration.add_vetoable_change_listener(Arc::clone(&listener)));
        assert!(per_registration.add_vetoable_change_listener(Arc::clone(&listener)));
        per_registration.fire_vetoable_change("x", 1, 2).unwrap();
        assert_eq!(log.names(), ["dup", "dup"]);

        let config = ChangeConfig { duplicates: DuplicatePolicy::Once, ..ChangeConfig::default() };
        let once = ChangeSupport::with_config("bean:test", config);
        assert!(once.add_vetoable_change_listener(Arc::clone(&listener)));
        assert!(!once.add_vetoable_change_listener(Arc::clone(&listener)));
        once.fire_vetoable_change("x", 1, 2).unwrap();
        assert_eq!(log.names(), ["dup", "dup", "dup"]);
    }

    #[test]
    fn test_mismatched_veto_event_is_substituted() {
        let errors = ErrorSink::default();
        let support = ChangeSupport::new("bean:test");
        support.add_exception_listener(Arc::new(errors.clone()));
        support.add_vetoable_change_listener(Arc::new(|_: &PropertyChangeEvent| {
            Err(PropertyVetoError::new("wrong event", event(8, 9)))
        }));

        let veto = support.fire_vetoable_change("x", 1, 2).unwrap_err();

        assert_eq!(veto.event(), &event(1, 2));
        assert_eq!(veto.message(), "wrong event");
        assert_eq!(errors.messages().len(), 1);
        assert!(errors.messages()[0].starts_with("Veto event mismatch"));
    }

    #[test]
    fn test_mismatched_veto_event_can_be_preserved() {
        let config =
            ChangeConfig { veto_event: VetoEventPolicy::Preserve, ..ChangeConfig::default() };
        let support = ChangeSupport::with_config("bean:test", config);
        support.add_vetoable_change_listener(Arc::new(|_: &PropertyChangeEvent| {
            Err(PropertyVetoError::new("wrong event", event(8, 9)))
        }));

        let veto = support.fire_vetoable_change("x", 1, 2).unwrap_err();
        assert_eq!(veto.event(), &event(8, 9));
    }

    #[test]
    fn test_named_listeners_only_hear_their_property() {
        let log = CallLog::default();
        let support = ChangeSupport::new("bean:test");
        support.add_property_change_listener_for("x", observer("x-only", &log));
        support.add_property_change_listener(observer("all", &log));

        support.fire_property_change("x", 1, 2);
        support.fire_property_change("y", 1, 2);
        support.fire_property_change_event(&PropertyChangeEvent::unnamed(
            "bean:test".into(),
            Value::Null,
            Value::Null,
        ));

        assert_eq!(log.names(), ["x-only", "all", "all", "all"]);
        assert!(support.has_listeners(Some("y")));

        let x_only = observer("gone", &log);
        support.add_property_change_listener_for("z", Arc::clone(&x_only));
        assert!(!support.remove_property_change_listener(&x_only), "scope must match on removal");
        assert!(support.remove_property_change_listener_for("z", &x_only));
    }

    #[test]
    fn test_unchanged_value_notifies_nobody() {
        let log = CallLog::default();
        let support = ChangeSupport::new("bean:test");
        support.add_vetoable_change_listener(vetoer("v", &log));
        support.add_property_change_listener(observer("p", &log));

        assert!(support.fire_vetoable_change("x", 5, 5).is_ok());
        assert_eq!(support.fire_property_change("x", "same", "same"), 0);
        assert!(log.names().is_empty());
    }

    #[test]
    fn test_veto_converts_into_change_error() {
        let support = ChangeSupport::new("bean:test");
        support.add_vetoable_change_listener(Arc::new(|e: &PropertyChangeEvent| {
            Err(PropertyVetoError::new("locked", e.clone()))
        }));

        let result: Result<(), ChangeError> =
            support.fire_vetoable_change("x", 1, 2).context("saving form");

        let err = result.unwrap_err();
        assert!(matches!(&err, ChangeError::Vetoed { source, .. } if source.event() == &event(1, 2)));
        assert!(err.to_string().starts_with("Change rejected (saving form)"));
    }

    #[test]
    fn test_concurrent_sets_propose_from_the_committed_value() {
        let log = CallLog::default();
        let support = ChangeSupport::new("bean:test");
        let x = Constrained::new("x", 0_i64);
        let start = std::sync::Barrier::new(2);

        support.add_vetoable_change_listener(Arc::new(|_: &PropertyChangeEvent| {
            std::thread::sleep(std::time::Duration::from_millis(20));
            Ok::<(), PropertyVetoError>(())
        }));
        support.add_vetoable_change_listener(acceptor("v", &log));
        support.add_property_change_listener(observer("p", &log));

        std::thread::scope(|scope| {
            for target in [1_i64, 2] {
                let (support, x, start) = (&support, &x, &start);
                scope.spawn(move || {
                    start.wait();
                    x.set(support, target).unwrap();
                });
            }
        });

        let proposed = log.events_for("v");
        let committed = log.events_for("p");
        assert_eq!(proposed, committed, "every committed change was the one approved");
        assert_eq!(committed.len(), 2);
        assert_eq!(committed[0].old_value(), &Value::Int(0));
        assert_eq!(committed[1].old_value(), committed[0].new_value());
        assert_eq!(&Value::Int(x.get()), committed[1].new_value());
    }

    #[test]
    fn test_concurrent_registration_during_dispatch() {
        let log = CallLog::default();
        let support = Arc::new(ChangeSupport::new("bean:test"));
        support.add_vetoable_change_listener(acceptor("base", &log));

        std::thread::scope(|scope| {
            let writer = Arc::clone(&support);
            let writer_log = log.clone();
            scope.spawn(move || {
                for _ in 0..200 {
                    let l = acceptor("churn", &writer_log);
                    writer.add_vetoable_change_listener(Arc::clone(&l));
                    writer.remove_vetoable_change_listener(&l);
                }
            });

            for i in 0..200 {
                support.fire_vetoable_change("x", i, i + 1).unwrap();
            }
        });

        assert_eq!(support.vetoable_change_listener_count(), 1);
        assert_eq!(log.events_for("base").len(), 200);
    }
}
