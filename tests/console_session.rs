use pulse_gen::{
    CommandConsole, ConsoleExit, EventGenerator, GeneratorConfig, OutputFormat, TIER_LABELS,
};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Sink the test can read while the generator thread still owns a clone.
#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    fn events(&self) -> usize {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf).matches("Event ID: ").count()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn config(interval_ms: u64, format: OutputFormat) -> GeneratorConfig {
    GeneratorConfig {
        min_interval_ms: interval_ms,
        max_interval_ms: interval_ms,
        format,
        seed: Some(2024),
        ..Default::default()
    }
}

#[test]
fn test_console_drives_running_generator() {
    let generator =
        EventGenerator::new(&config(4000, OutputFormat::Pretty), Vec::<u8>::new()).unwrap();
    let control = generator.control();
    let task = generator.spawn().unwrap();
    // let the first tick happen before any command lands
    thread::sleep(Duration::from_millis(50));

    let console = CommandConsole::new(control.clone(), TIER_LABELS[1]);
    let mut out: Vec<u8> = Vec::new();
    let exit = console
        .run("faster\nslower slower\nlevel2\npause\nnonsense\nexit\n".as_bytes(), &mut out)
        .unwrap();
    let transcript = String::from_utf8(out).unwrap();

    assert_eq!(exit, ConsoleExit::Command);
    assert!(!transcript.contains("Interval decreased"));
    assert!(transcript.contains("Interval increased to 14000 milliseconds."));
    assert!(transcript.contains("Interval increased to 24000 milliseconds."));
    assert!(transcript.contains("Unknown command"));

    let state = control.snapshot();
    assert_eq!(state.interval, Duration::from_millis(24_000));
    assert_eq!(state.verbosity_level, 2);
    assert!(state.paused);

    // the loop sits in a 4s wait; shutdown must cut it short
    let started = Instant::now();
    let sink = task.shutdown().unwrap();
    assert!(started.elapsed() < Duration::from_secs(3));

    // only the first tick ran, before any console command, at level 1
    let events = String::from_utf8(sink).unwrap();
    assert_eq!(events.matches("Event ID: ").count(), 1);
    assert_eq!(events.matches("Param1: ").count(), 1);
    assert_eq!(events.matches("Param2: ").count(), 0);
}

#[test]
fn test_resume_restores_output_at_level0() {
    let generator =
        EventGenerator::new(&config(10, OutputFormat::Json), Vec::<u8>::new()).unwrap();
    let control = generator.control();
    control.pause();
    let task = generator.spawn().unwrap();

    thread::sleep(Duration::from_millis(80));
    let console = CommandConsole::new(control, TIER_LABELS[1]);
    let mut out: Vec<u8> = Vec::new();
    console.run("level0 resume\n".as_bytes(), &mut out).unwrap();
    thread::sleep(Duration::from_millis(80));

    let sink = String::from_utf8(task.shutdown().unwrap()).unwrap();
    let events: Vec<serde_json::Value> = sink
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert!(!events.is_empty());
    for event in &events {
        assert_eq!(event["tier"], "level0.log");
        assert!(event.get("param1").is_none());
        let id = event["event_id"].as_i64().unwrap();
        assert!((1..=100).contains(&id));
    }
}

#[test]
fn test_resume_waits_out_the_paused_interval() {
    let sink = SharedSink::default();
    let generator = EventGenerator::new(&config(400, OutputFormat::Pretty), sink.clone()).unwrap();
    let control = generator.control();
    control.pause();
    let task = generator.spawn().unwrap();

    // the first tick is suppressed and its 400ms wait is already running
    thread::sleep(Duration::from_millis(50));
    let console = CommandConsole::new(control, TIER_LABELS[1]);
    let mut out: Vec<u8> = Vec::new();
    console.run("resume\n".as_bytes(), &mut out).unwrap();

    // resume does not trigger an early tick
    thread::sleep(Duration::from_millis(150));
    assert_eq!(sink.events(), 0);

    // the next tick lands when the original wait ends, around 400ms
    thread::sleep(Duration::from_millis(400));
    task.shutdown().unwrap();
    assert_eq!(sink.events(), 1);
}

#[test]
fn test_out_of_range_level_silences_output() {
    let generator =
        EventGenerator::new(&config(5, OutputFormat::Pretty), Vec::<u8>::new()).unwrap();
    generator.set_verbosity_level(9);
    let task = generator.spawn().unwrap();

    thread::sleep(Duration::from_millis(60));
    assert!(task.shutdown().unwrap().is_empty());
}
