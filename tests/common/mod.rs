//! A scripted stand-in for the codec, the reference tools and `make`.
//!
//! Encoded streams are padded to a configurable fraction of the input so
//! ratios are predictable. The original bytes travel inside the coding
//! table as `[kind][u32 length][bytes]`, so decoding really depends on the
//! table and a truncated one fails like the real codec does.

#![allow(dead_code)]

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use codec_bench_harness::config::HarnessConfig;
use codec_bench_harness::dataset::{TestCase, TestSet};
use codec_bench_harness::invoker::{Invocation, InvocationOutput, Invoker};
use codec_bench_harness::Result;
use flate2::write::GzEncoder;
use flate2::Compression;

pub const CODEC: &str = "fake-codec";

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub struct FakeTools {
    pub calls: Vec<Invocation>,
    /// Fraction of the input size used for simple and contextual streams.
    pub simple_ratio: f64,
    pub contextual_ratio: f64,
    /// Base names whose decoded output gets one byte flipped.
    pub corrupt_decodes: HashSet<String>,
    /// Write coding tables that are cut short.
    pub truncate_tables: bool,
    /// Stamp encoded streams with the other variant's header.
    pub wrong_headers: bool,
    /// Program name that exits 1 on its n-th call (0-based).
    pub fail_program: Option<(String, usize)>,
    pub build_fails: bool,
}

impl Default for FakeTools {
    fn default() -> Self {
        FakeTools {
            calls: Vec::new(),
            simple_ratio: 0.65,
            contextual_ratio: 0.60,
            corrupt_decodes: HashSet::new(),
            truncate_tables: false,
            wrong_headers: false,
            fail_program: None,
            build_fails: false,
        }
    }
}

fn arg(invocation: &Invocation, index: usize) -> PathBuf {
    PathBuf::from(&invocation.args[index])
}

fn base_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

impl FakeTools {
    pub fn calls_to(&self, program: &str) -> usize {
        self.calls.iter().filter(|c| c.program == Path::new(program)).count()
    }

    pub fn flags(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter(|c| c.program == Path::new(CODEC))
            .map(|c| c.args[3].to_string_lossy().into_owned())
            .collect()
    }

    fn encode(&self, invocation: &Invocation) -> std::io::Result<InvocationOutput> {
        let input = fs::read(arg(invocation, 0))?;
        let simple = invocation.args[3] == OsString::from("-h");
        let ratio = if simple { self.simple_ratio } else { self.contextual_ratio };

        let target = ((input.len() as f64 * ratio).round() as usize).max(1);
        let mut stream = vec![if simple != self.wrong_headers { 0x38 } else { 0x30 }];
        stream.resize(target, 0xA5);
        fs::write(arg(invocation, 2), stream)?;

        let mut table = vec![if simple { 0x00 } else { 0x80 }];
        table.extend_from_slice(&(input.len() as u32).to_le_bytes());
        table.extend_from_slice(&input);
        if self.truncate_tables {
            table.truncate(table.len() / 2);
        }
        fs::write(arg(invocation, 5), table)?;
        Ok(InvocationOutput::success())
    }

    fn decode(&self, invocation: &Invocation) -> std::io::Result<InvocationOutput> {
        let table = fs::read(arg(invocation, 5))?;
        if table.len() < 5 {
            return Ok(InvocationOutput::failure(1, "Error: malformed encoding table."));
        }
        let declared = u32::from_le_bytes([table[1], table[2], table[3], table[4]]) as usize;
        let mut data = table[5..].to_vec();
        if data.len() != declared {
            return Ok(InvocationOutput::failure(1, "Error: malformed encoding table."));
        }

        let output = arg(invocation, 2);
        let original = base_name(&output);
        let original = original.rsplit_once('.').map(|(b, _)| b.to_owned()).unwrap_or(original);
        if self.corrupt_decodes.contains(&original) {
            if let Some(byte) = data.last_mut() {
                *byte ^= 0xFF;
            }
        }
        fs::write(output, data)?;
        Ok(InvocationOutput::success())
    }

    fn gzip(&self, invocation: &Invocation) -> std::io::Result<InvocationOutput> {
        let input = fs::read(arg(invocation, 1))?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&input)?;
        fs::write(invocation.stdout.as_ref().unwrap(), encoder.finish()?)?;
        Ok(InvocationOutput::success())
    }

    fn bzip2(&self, invocation: &Invocation) -> std::io::Result<InvocationOutput> {
        let input = fs::read(arg(invocation, 1))?;
        let mut output = b"BZh9".to_vec();
        output.extend_from_slice(&input[..input.len() / 2]);
        fs::write(invocation.stdout.as_ref().unwrap(), output)?;
        Ok(InvocationOutput::success())
    }
}

impl Invoker for FakeTools {
    fn invoke(&mut self, invocation: &Invocation) -> Result<InvocationOutput> {
        let program = invocation.program_name();
        let nth = self.calls.iter().filter(|c| c.program == invocation.program).count();
        self.calls.push(invocation.clone());

        if let Some((failing, at)) = &self.fail_program {
            if *failing == program && *at == nth {
                return Ok(InvocationOutput::failure(1, format!("{program}: simulated failure")));
            }
        }

        let output = match program.as_str() {
            "make" if self.build_fails => {
                InvocationOutput::failure(2, "make: *** No rule to make target")
            }
            "make" => InvocationOutput::success(),
            "gzip" => self.gzip(invocation)?,
            "bzip2" => self.bzip2(invocation)?,
            CODEC => match &*invocation.args[3].to_string_lossy() {
                "-h" | "-" => self.encode(invocation)?,
                "-xh" | "-x" => self.decode(invocation)?,
                other => InvocationOutput::failure(1, format!("Warning: Unknown option {other}.")),
            },
            _ => InvocationOutput::failure(127, "command not found"),
        };
        Ok(output)
    }
}

/// Writes the named inputs into `root/input` and returns a matching config.
pub fn config_with_inputs(root: &Path, inputs: &[(&str, &[u8])]) -> HarnessConfig {
    let input_dir = root.join("input");
    fs::create_dir_all(&input_dir).unwrap();
    let cases = inputs
        .iter()
        .map(|(name, bytes)| {
            let path = input_dir.join(format!("input_{name}.txt"));
            fs::write(&path, bytes).unwrap();
            TestCase::new(*name, path)
        })
        .collect();

    HarnessConfig {
        codec: PathBuf::from(CODEC),
        scratch_dir: root.join(".tmp"),
        build_command: vec!["make".to_owned()],
        gzip: PathBuf::from("gzip"),
        bzip2: PathBuf::from("bzip2"),
        tests: TestSet::new(cases).unwrap(),
        results_file: None,
    }
}

/// 1000 bytes of lorem ipsum.
pub fn ipsum() -> Vec<u8> {
    let text = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor. ";
    text.iter().copied().cycle().take(1000).collect()
}
