use brc_processor::models::Chunk;
use brc_processor::readers::ChunkPlanner;
use brc_processor::{summarise, ProcessingConfig, ProcessingError};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    input: PathBuf,
}

impl Fixture {
    fn new(content: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let input = dir.path().join("measurements.txt");
        std::fs::write(&input, content).expect("Failed to write input");
        Self { dir, input }
    }

    fn run(&self, workers: usize) -> String {
        self.run_with(ProcessingConfig::default().with_workers(workers))
            .expect("processing failed")
    }

    fn run_with(&self, config: ProcessingConfig) -> brc_processor::Result<String> {
        let output = self.dir.path().join(format!("out-{}.txt", config.workers));
        let report = summarise(&self.input, &output, &config)?;
        let written = std::fs::read_to_string(&output)?;
        assert_eq!(report, written);
        Ok(written)
    }
}

fn sample_input() -> String {
    let stations = [
        "Hamburg", "Bulawayo", "Palembang", "St. John's", "Cracow", "Bridgetown",
        "İzmir", "Roseau", "Conakry", "Zürich", "Abéché", "Ürümqi",
    ];
    let mut content = String::new();
    for i in 0..2_000usize {
        let name = stations[(i * 7) % stations.len()];
        let whole = (i * 37 % 199) as i64 - 99;
        let frac = i * 3 % 10;
        content.push_str(&format!("{};{}.{}\n", name, whole, frac));
        if i % 250 == 0 {
            content.push_str("garbageline\n");
        }
    }
    content
}

#[test]
fn test_scenario_basic() {
    let fixture = Fixture::new("StationA;10.0\nStationB;20.5\nStationA;-5.3\n");
    assert_eq!(
        fixture.run(2),
        "StationA=-5.3/2.4/10.0, StationB=20.5/20.5/20.5"
    );
}

#[test]
fn test_scenario_empty_input() {
    let fixture = Fixture::new("");
    assert_eq!(fixture.run(4), "");
}

#[test]
fn test_scenario_malformed_lines_dropped() {
    let fixture = Fixture::new("Oslo;1.0\ngarbageline\nOslo;3.0\nno separator here\nLima;-2.5\n");
    assert_eq!(fixture.run(3), "Lima=-2.5/-2.5/-2.5, Oslo=1.0/2.0/3.0");
}

#[test]
fn test_scenario_single_worker_matches_multi_worker() {
    let fixture = Fixture::new(&sample_input());
    let single = fixture.run(1);
    for workers in [2, 3, 4, 7, 16, 64] {
        assert_eq!(fixture.run(workers), single, "workers = {}", workers);
    }
}

#[test]
fn test_idempotent() {
    let fixture = Fixture::new(&sample_input());
    assert_eq!(fixture.run(4), fixture.run(4));
}

#[test]
fn test_crlf_and_missing_final_newline() {
    let fixture = Fixture::new("A;1.0\r\nB;2.0\r\nA;3.0");
    assert_eq!(fixture.run(2), "A=1.0/2.0/3.0, B=2.0/2.0/2.0");
}

#[test]
fn test_station_set_and_ordering_invariants() {
    let content = sample_input();
    let fixture = Fixture::new(&content);
    let report = fixture.run(5);

    let mut expected: Vec<&str> = content
        .lines()
        .filter_map(|line| line.split_once(';').map(|(name, _)| name))
        .collect();
    expected.sort();
    expected.dedup();

    let entries: Vec<&str> = report.split(", ").collect();
    let names: Vec<&str> = entries
        .iter()
        .map(|e| e.rsplit_once('=').unwrap().0)
        .collect();
    assert_eq!(names, expected);

    for entry in entries {
        let values: Vec<f64> = entry
            .rsplit_once('=')
            .unwrap()
            .1
            .split('/')
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(values.len(), 3);
        assert!(values[0] <= values[1] && values[1] <= values[2], "{}", entry);
    }
}

#[test]
fn test_mmap_reader_matches_buffered() {
    let fixture = Fixture::new(&sample_input());
    let buffered = fixture.run(3);
    let mapped = fixture
        .run_with(ProcessingConfig::default().with_workers(3).with_mmap(true))
        .unwrap();
    assert_eq!(mapped, buffered);
}

#[test]
fn test_small_transfer_buffer() {
    let fixture = Fixture::new(&sample_input());
    let reference = fixture.run(2);
    let tiny = fixture
        .run_with(ProcessingConfig::default().with_workers(2).with_buffer_size(7))
        .unwrap();
    assert_eq!(tiny, reference);
}

#[test]
fn test_strict_mode_aborts_without_output() {
    let fixture = Fixture::new("Oslo;1.0\nOslo;1..0\n");
    let config = ProcessingConfig::default().with_workers(2).with_strict(true);
    let output = fixture.dir.path().join("strict.out");

    let result = summarise(&fixture.input, &output, &config);
    assert!(matches!(result, Err(ProcessingError::InvalidFormat(_))));
    assert!(!output.exists());
}

#[test]
fn test_missing_input_aborts() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.txt");
    let result = summarise(
        &dir.path().join("missing.txt"),
        &output,
        &ProcessingConfig::default(),
    );
    assert!(matches!(result, Err(ProcessingError::Io(_))));
    assert!(!output.exists());
}

#[test]
fn test_invalid_config_rejected() {
    let fixture = Fixture::new("A;1.0\n");
    let result = fixture.run_with(ProcessingConfig::default().with_workers(0));
    assert!(matches!(result, Err(ProcessingError::Validation(_))));
}

#[test]
fn test_chunks_reconstruct_file() {
    let content = sample_input();
    let fixture = Fixture::new(&content);
    let bytes = std::fs::read(&fixture.input).unwrap();

    for workers in [1, 2, 5, 13] {
        let chunks: Vec<Chunk> = ChunkPlanner::new(workers).plan_file(&fixture.input).unwrap();
        let rebuilt: Vec<u8> = chunks
            .iter()
            .flat_map(|c| bytes[c.start as usize..c.end as usize].iter().copied())
            .collect();
        assert_eq!(rebuilt, bytes);
    }
}
