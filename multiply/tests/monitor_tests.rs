#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::{Duration, Instant};

    use anyhow::{Result, bail};
    use test_case::test_case;

    use multiply::monitor::{DeviceMonitor, DeviceProbe, DeviceRegistry, diff_devices};
    use multiply::notify::Notifier;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Added(String, u32),
        Removed(String),
    }

    #[derive(Default)]
    struct RecordingRegistry {
        events: Vec<Event>,
        devices: HashMap<String, u32>,
    }

    impl DeviceRegistry<String, u32> for RecordingRegistry {
        fn add_device(&mut self, id: String, info: u32) {
            self.events.push(Event::Added(id.clone(), info));
            self.devices.insert(id, info);
        }

        fn remove_device(&mut self, id: &String) {
            self.events.push(Event::Removed(id.clone()));
            self.devices.remove(id);
        }
    }

    #[derive(Default)]
    struct FakeProbe {
        present: Mutex<HashMap<String, u32>>,
    }

    impl FakeProbe {
        fn plug(&self, id: &str, info: u32) {
            self.present.lock().unwrap().insert(id.to_string(), info);
        }
    }

    impl DeviceProbe for FakeProbe {
        type Id = String;
        type Info = u32;

        fn check(&self) -> Result<HashMap<String, u32>> {
            Ok(self.present.lock().unwrap().clone())
        }

        fn eject(&self, id: &String) -> Result<bool> {
            match id.as_str() {
                "busy" => Ok(false),
                "broken" => bail!("device not responding"),
                _ => Ok(self.present.lock().unwrap().remove(id).is_some()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn started(&self) {}
        fn finished(&self) {}
        fn partial_failure(&self, _n_unplaced: usize) {}
        fn message(&self, text: &str) {
            self.messages.lock().unwrap().push(text.to_string());
        }
    }

    fn devices(entries: &[(&str, u32)]) -> HashMap<String, u32> {
        entries.iter().map(|(id, info)| (id.to_string(), *info)).collect()
    }

    fn wait_until(condition: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn diff_reports_only_changes() {
        let previous = devices(&[("a", 1), ("b", 2), ("c", 3)]);
        let current = devices(&[("a", 1), ("b", 5), ("d", 4)]);
        let mut registry = RecordingRegistry::default();

        diff_devices(&previous, &current, &mut registry);

        assert_eq!(
            registry.events,
            vec![
                Event::Removed("b".to_string()),
                Event::Added("b".to_string(), 5),
                Event::Added("d".to_string(), 4),
                Event::Removed("c".to_string()),
            ]
        );
    }

    #[test]
    fn identical_reports_produce_nothing() {
        let report = devices(&[("a", 1), ("b", 2)]);
        let mut registry = RecordingRegistry::default();
        diff_devices(&report, &report.clone(), &mut registry);
        assert!(registry.events.is_empty());
    }

    #[test]
    fn monitor_tracks_devices_until_stopped() {
        let _ = env_logger::builder().is_test(true).try_init();
        let probe = Arc::new(FakeProbe::default());
        probe.plug("usb0", 16);
        let registry = Arc::new(Mutex::new(RecordingRegistry::default()));

        let mut monitor = DeviceMonitor::start(
            probe.clone(),
            registry.clone(),
            Arc::new(RecordingNotifier::default()),
            Duration::from_millis(10),
        )
        .unwrap();
        assert!(monitor.is_running());
        assert!(wait_until(|| registry.lock().unwrap().devices.contains_key("usb0")));

        probe.plug("usb1", 32);
        probe.plug("usb0", 64);
        assert!(wait_until(|| registry.lock().unwrap().devices == devices(&[("usb0", 64), ("usb1", 32)])));

        monitor.stop().unwrap();
        assert!(!monitor.is_running());
        let registry = registry.lock().unwrap();
        assert!(registry.devices.is_empty());
        //a second stop is a no-op
        drop(registry);
        monitor.stop().unwrap();
    }

    #[test_case("usb0", true, "Ejected"; "ejectable device")]
    #[test_case("busy", false, "Failed to eject"; "busy device")]
    #[test_case("broken", false, "Failed to eject"; "failing device")]
    fn eject_is_reported(id: &str, expected: bool, message_start: &str) {
        let probe = Arc::new(FakeProbe::default());
        probe.plug(id, 1);
        let notifier = Arc::new(RecordingNotifier::default());
        let monitor = DeviceMonitor::start(
            probe,
            Arc::new(Mutex::new(RecordingRegistry::default())),
            notifier.clone(),
            Duration::from_millis(10),
        )
        .unwrap();

        assert_eq!(monitor.eject(&id.to_string()), expected);
        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with(message_start));
    }
}
