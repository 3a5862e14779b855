// Command-line front end for histdelta.
//
// Subcommands: line diffs of two files, delta encode/decode against a
// source file, a listing of a delta's opcodes, and index statistics.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::delta::{DeltaIndex, binary};
use crate::diff::{DEFAULT_MAX_CHAIN_LENGTH, Edit, RawText, RawTextComparator, Sequence};
use crate::engine::{self, Algorithm, DiffOptions};

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Byte size parsing (supports K, M, G suffixes)
// ---------------------------------------------------------------------------

fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty size string".into());
    }
    let (num_part, multiplier) = match s.as_bytes().last() {
        Some(b'k' | b'K') => (&s[..s.len() - 1], 1024u64),
        Some(b'm' | b'M') => (&s[..s.len() - 1], 1024 * 1024),
        Some(b'g' | b'G') => (&s[..s.len() - 1], 1024 * 1024 * 1024),
        _ => (s, 1u64),
    };
    let num: u64 = num_part
        .trim()
        .parse()
        .map_err(|e| format!("invalid size '{s}': {e}"))?;
    num.checked_mul(multiplier)
        .ok_or_else(|| format!("size overflow: '{s}'"))
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Histogram diff and git-format binary deltas.
#[derive(Parser, Debug)]
#[command(
    name = "histdelta",
    version,
    about = "Histogram diff and git-format binary deltas",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Show line differences between two files.
    Diff(DiffArgs),
    /// Encode TARGET as a delta against a source file.
    Encode(EncodeArgs),
    /// Rebuild a target from a source file and a delta.
    Decode(DecodeArgs),
    /// List the opcodes of a delta.
    Print(PrintArgs),
    /// Print delta index statistics for a source file.
    Index(IndexArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlgorithmArg {
    Histogram,
    Myers,
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// Old file.
    #[arg(value_hint = ValueHint::FilePath)]
    old: PathBuf,

    /// New file.
    #[arg(value_hint = ValueHint::FilePath)]
    new: PathBuf,

    /// Diff algorithm.
    #[arg(long, value_enum, default_value_t = AlgorithmArg::Histogram)]
    algorithm: AlgorithmArg,

    /// Histogram bucket bound; regions beyond it use the fallback.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..), default_value_t = DEFAULT_MAX_CHAIN_LENGTH as u64)]
    max_chain_length: u64,

    /// Replace repetitive regions whole instead of running Myers on them.
    #[arg(long)]
    no_fallback: bool,

    /// Ignore all whitespace when comparing lines.
    #[arg(short = 'w', long, conflicts_with = "ignore_trailing_whitespace")]
    ignore_whitespace: bool,

    /// Ignore whitespace at the end of lines.
    #[arg(long)]
    ignore_trailing_whitespace: bool,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Source file to copy from.
    #[arg(long, short = 's', value_hint = ValueHint::FilePath)]
    source: PathBuf,

    /// Target file.
    #[arg(value_hint = ValueHint::FilePath)]
    target: PathBuf,

    /// Output delta file (default: stdout).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Give up if the delta would exceed this size (supports K/M/G suffix).
    #[arg(long, value_parser = parse_byte_size)]
    limit: Option<u64>,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Source file the delta was made against.
    #[arg(long, short = 's', value_hint = ValueHint::FilePath)]
    source: PathBuf,

    /// Delta file.
    #[arg(value_hint = ValueHint::FilePath)]
    delta: PathBuf,

    /// Output file (default: stdout).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PrintArgs {
    /// Delta file.
    #[arg(value_hint = ValueHint::FilePath)]
    delta: PathBuf,

    /// Omit the DELTA( BASE=.. RESULT=.. ) line.
    #[arg(long)]
    no_header: bool,
}

#[derive(Args, Debug)]
struct IndexArgs {
    /// Source file to index.
    #[arg(value_hint = ValueHint::FilePath)]
    source: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Diff,
    Encode,
    Decode,
    Print,
    Index,
}

#[derive(Debug)]
struct Options {
    command: Command,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    diff: DiffOptions,
    no_header: bool,
    limit: Option<usize>,
    source_file: Option<PathBuf>,
    input_files: Vec<PathBuf>,
    output_file: Option<PathBuf>,
}

impl Options {
    fn new(command: Command, cli: &Cli) -> Self {
        Self {
            command,
            force: cli.force,
            quiet: cli.quiet,
            verbose: cli.verbose.min(2),
            json_output: cli.json_output,
            diff: DiffOptions::default(),
            no_header: false,
            limit: None,
            source_file: None,
            input_files: Vec::new(),
            output_file: None,
        }
    }
}

fn resolve_options(cli: Cli) -> Options {
    match &cli.command {
        Cmd::Diff(args) => {
            let comparator = if args.ignore_whitespace {
                RawTextComparator::IgnoreAllWhitespace
            } else if args.ignore_trailing_whitespace {
                RawTextComparator::IgnoreTrailingWhitespace
            } else {
                RawTextComparator::Default
            };
            Options {
                diff: DiffOptions {
                    algorithm: match args.algorithm {
                        AlgorithmArg::Histogram => Algorithm::Histogram,
                        AlgorithmArg::Myers => Algorithm::Myers,
                    },
                    max_chain_length: usize::try_from(args.max_chain_length)
                        .unwrap_or(usize::MAX),
                    fallback: !args.no_fallback,
                    comparator,
                },
                input_files: vec![args.old.clone(), args.new.clone()],
                ..Options::new(Command::Diff, &cli)
            }
        }
        Cmd::Encode(args) => Options {
            limit: args
                .limit
                .map(|l| usize::try_from(l).unwrap_or(usize::MAX)),
            source_file: Some(args.source.clone()),
            input_files: vec![args.target.clone()],
            output_file: args.output.clone(),
            ..Options::new(Command::Encode, &cli)
        },
        Cmd::Decode(args) => Options {
            source_file: Some(args.source.clone()),
            input_files: vec![args.delta.clone()],
            output_file: args.output.clone(),
            ..Options::new(Command::Decode, &cli)
        },
        Cmd::Print(args) => Options {
            no_header: args.no_header,
            input_files: vec![args.delta.clone()],
            ..Options::new(Command::Print, &cli)
        },
        Cmd::Index(args) => Options {
            source_file: Some(args.source.clone()),
            ..Options::new(Command::Index, &cli)
        },
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("histdelta".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

fn read_input(what: &str, path: &Path) -> Result<Vec<u8>, i32> {
    std::fs::read(path).map_err(|e| {
        eprintln!("histdelta: {what}: {}: {e}", path.display());
        1
    })
}

/// Write `data` to `path`, or stdout when there is no path.
fn write_output(path: Option<&Path>, data: &[u8], force: bool) -> Result<(), i32> {
    let mut writer: Box<dyn Write> = match path {
        None => Box::new(BufWriter::with_capacity(BUF_SIZE, io::stdout().lock())),
        Some(path) => {
            if path.exists() && !force {
                eprintln!(
                    "histdelta: output file exists, use -f to overwrite: {}",
                    path.display()
                );
                return Err(1);
            }
            match File::create(path) {
                Ok(f) => Box::new(BufWriter::with_capacity(BUF_SIZE, f)),
                Err(e) => {
                    eprintln!("histdelta: output file: {}: {e}", path.display());
                    return Err(1);
                }
            }
        }
    };
    writer
        .write_all(data)
        .and_then(|()| writer.flush())
        .map_err(|e| {
            eprintln!("histdelta: write error: {e}");
            1
        })
}

fn print_json(json: &serde_json::Value) {
    match serde_json::to_string_pretty(json) {
        Ok(s) => eprintln!("{s}"),
        Err(e) => eprintln!("histdelta: json: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Diff command
// ---------------------------------------------------------------------------

/// Write `edits` as hunks: `@@ -a,n +b,m @@` followed by the removed lines
/// of `a` prefixed `-` and the added lines of `b` prefixed `+`.
fn write_hunks<W: Write>(
    w: &mut W,
    a: &RawText<'_>,
    b: &RawText<'_>,
    edits: &[Edit],
) -> io::Result<()> {
    for e in edits {
        writeln!(
            w,
            "@@ -{},{} +{},{} @@",
            hunk_start(e.begin_a, e.len_a()),
            e.len_a(),
            hunk_start(e.begin_b, e.len_b()),
            e.len_b()
        )?;
        for (prefix, text, range) in [('-', a, e.begin_a..e.end_a), ('+', b, e.begin_b..e.end_b)] {
            for i in range {
                write!(w, "{prefix}")?;
                w.write_all(text.line_text(i))?;
                writeln!(w)?;
            }
        }
    }
    Ok(())
}

/// One-based first line of a hunk side; an empty side names the line
/// before it.
fn hunk_start(begin: usize, len: usize) -> usize {
    if len == 0 { begin } else { begin + 1 }
}

fn cmd_diff(opts: &Options) -> i32 {
    let [old_path, new_path] = &opts.input_files[..] else {
        eprintln!("histdelta: diff needs two files");
        return 1;
    };
    let old = match read_input("old file", old_path) {
        Ok(d) => d,
        Err(code) => return code,
    };
    let new = match read_input("new file", new_path) {
        Ok(d) => d,
        Err(code) => return code,
    };

    if RawText::is_binary(&old) || RawText::is_binary(&new) {
        if old != new && !opts.quiet {
            println!(
                "Binary files {} and {} differ",
                old_path.display(),
                new_path.display()
            );
        }
        return 0;
    }

    let edits = engine::diff_text_with_options(&old, &new, &opts.diff);
    let a = RawText::new(&old);
    let b = RawText::new(&new);

    if !opts.quiet {
        let mut out = BufWriter::with_capacity(BUF_SIZE, io::stdout().lock());
        if let Err(e) = write_hunks(&mut out, &a, &b, &edits).and_then(|()| out.flush()) {
            eprintln!("histdelta: write error: {e}");
            return 1;
        }
    }

    let removed: usize = edits.iter().map(Edit::len_a).sum();
    let added: usize = edits.iter().map(Edit::len_b).sum();
    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "histdelta: diff: {} hunks, -{removed} +{added} lines ({} -> {} lines)",
            edits.len(),
            a.len(),
            b.len()
        );
    }
    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "diff",
            "hunks": edits.len(),
            "lines_removed": removed,
            "lines_added": added,
            "old_lines": a.len(),
            "new_lines": b.len(),
        }));
    }
    0
}

// ---------------------------------------------------------------------------
// Encode command
// ---------------------------------------------------------------------------

fn cmd_encode(opts: &Options) -> i32 {
    let (Some(source_path), Some(target_path)) = (&opts.source_file, opts.input_files.first())
    else {
        eprintln!("histdelta: encode needs a source and a target");
        return 1;
    };
    let source = match read_input("source file", source_path) {
        Ok(d) => d,
        Err(code) => return code,
    };
    let target = match read_input("target file", target_path) {
        Ok(d) => d,
        Err(code) => return code,
    };

    let delta = match opts.limit {
        None => engine::encode(&source, &target).map(Some),
        Some(limit) => engine::encode_with_limit(&source, &target, limit),
    };
    let delta = match delta {
        Ok(Some(d)) => d,
        Ok(None) => {
            eprintln!(
                "histdelta: delta exceeds limit of {} bytes",
                opts.limit.unwrap_or_default()
            );
            if opts.json_output {
                print_json(&serde_json::json!({
                    "command": "encode",
                    "source_size": source.len(),
                    "target_size": target.len(),
                    "limit": opts.limit,
                    "limit_exceeded": true,
                }));
            }
            return 1;
        }
        Err(e) => {
            eprintln!("histdelta: encode error: {e}");
            return 1;
        }
    };

    if let Err(code) = write_output(opts.output_file.as_deref(), &delta, opts.force) {
        return code;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "histdelta: encoder: source size: {}, target size: {}, delta size: {}",
            source.len(),
            target.len(),
            delta.len()
        );
    }
    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "encode",
            "source_size": source.len(),
            "target_size": target.len(),
            "delta_size": delta.len(),
            "limit": opts.limit,
            "limit_exceeded": false,
        }));
    }
    0
}

// ---------------------------------------------------------------------------
// Decode command
// ---------------------------------------------------------------------------

fn cmd_decode(opts: &Options) -> i32 {
    let (Some(source_path), Some(delta_path)) = (&opts.source_file, opts.input_files.first())
    else {
        eprintln!("histdelta: decode needs a source and a delta");
        return 1;
    };
    let source = match read_input("source file", source_path) {
        Ok(d) => d,
        Err(code) => return code,
    };
    let delta = match read_input("delta file", delta_path) {
        Ok(d) => d,
        Err(code) => return code,
    };

    let target = match engine::decode(&source, &delta) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("histdelta: decode error: {e}");
            return 1;
        }
    };

    if let Err(code) = write_output(opts.output_file.as_deref(), &target, opts.force) {
        return code;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "histdelta: decoder: source size: {}, delta size: {}, output size: {}",
            source.len(),
            delta.len(),
            target.len()
        );
    }
    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "decode",
            "source_size": source.len(),
            "delta_size": delta.len(),
            "output_size": target.len(),
        }));
    }
    0
}

// ---------------------------------------------------------------------------
// Print command
// ---------------------------------------------------------------------------

fn cmd_print(opts: &Options) -> i32 {
    let Some(delta_path) = opts.input_files.first() else {
        eprintln!("histdelta: print needs a delta file");
        return 1;
    };
    let delta = match read_input("delta file", delta_path) {
        Ok(d) => d,
        Err(code) => return code,
    };

    let listing = match binary::format(&delta, !opts.no_header) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("histdelta: {}: {e}", delta_path.display());
            return 1;
        }
    };
    if let Err(code) = write_output(None, listing.as_bytes(), opts.force) {
        return code;
    }

    if opts.json_output {
        // The listing parsed, so the header and opcodes are well formed.
        let (base, result) = match binary::header(&delta) {
            Ok(h) => (h.base_size, h.result_size),
            Err(_) => (0, 0),
        };
        let (mut copies, mut inserts) = (0usize, 0usize);
        if let Ok(ops) = binary::opcodes(&delta) {
            for op in ops.flatten() {
                match op {
                    crate::delta::Opcode::Copy { .. } => copies += 1,
                    crate::delta::Opcode::Insert(_) => inserts += 1,
                }
            }
        }
        print_json(&serde_json::json!({
            "command": "print",
            "base_size": base,
            "result_size": result,
            "copies": copies,
            "inserts": inserts,
        }));
    }
    0
}

// ---------------------------------------------------------------------------
// Index command
// ---------------------------------------------------------------------------

fn cmd_index(opts: &Options) -> i32 {
    let Some(source_path) = &opts.source_file else {
        eprintln!("histdelta: index needs a source file");
        return 1;
    };
    let source = match read_input("source file", source_path) {
        Ok(d) => d,
        Err(code) => return code,
    };

    let index = DeltaIndex::new(&source);
    let estimate = DeltaIndex::estimate_index_size(source.len());
    if !opts.quiet {
        println!("{index}");
        println!("source size: {}", source.len());
        println!("index size: {}", index.index_size());
        println!("untruncated estimate: {estimate}");
    }
    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "index",
            "source_size": source.len(),
            "index_size": index.index_size(),
            "estimate": estimate,
        }));
    }
    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn log_filter(opts: &Options) -> &'static str {
    match (opts.quiet, opts.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(&opts)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match opts.command {
        Command::Diff => cmd_diff(&opts),
        Command::Encode => cmd_encode(&opts),
        Command::Decode => cmd_decode(&opts),
        Command::Print => cmd_print(&opts),
        Command::Index => cmd_index(&opts),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_opts(args: &[&str]) -> Options {
        let argv: Vec<String> = std::iter::once("histdelta".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        let cli = Cli::try_parse_from(argv).expect("cli parse failed");
        resolve_options(cli)
    }

    fn parse_err(args: &[&str]) -> clap::Error {
        let argv: Vec<String> = std::iter::once("histdelta".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        Cli::try_parse_from(argv).expect_err("cli parse should fail")
    }

    #[test]
    fn parse_byte_size_suffixes() {
        assert_eq!(parse_byte_size("1").unwrap(), 1);
        assert_eq!(parse_byte_size("2K").unwrap(), 2 * 1024);
        assert_eq!(parse_byte_size("3m").unwrap(), 3 * 1024 * 1024);
        assert_eq!(parse_byte_size("4G").unwrap(), 4 * 1024 * 1024 * 1024);
        assert!(parse_byte_size("").is_err());
        assert!(parse_byte_size("12x").is_err());
    }

    #[test]
    fn diff_subcommand_maps_correctly() {
        let opts = parse_opts(&[
            "diff",
            "--algorithm",
            "myers",
            "--max-chain-length",
            "8",
            "--no-fallback",
            "-w",
            "a.txt",
            "b.txt",
        ]);
        assert_eq!(opts.command, Command::Diff);
        assert_eq!(opts.diff.algorithm, Algorithm::Myers);
        assert_eq!(opts.diff.max_chain_length, 8);
        assert!(!opts.diff.fallback);
        assert_eq!(opts.diff.comparator, RawTextComparator::IgnoreAllWhitespace);
        assert_eq!(
            opts.input_files,
            vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]
        );
    }

    #[test]
    fn diff_defaults() {
        let opts = parse_opts(&["diff", "a", "b"]);
        assert_eq!(opts.diff.algorithm, Algorithm::Histogram);
        assert_eq!(opts.diff.max_chain_length, DEFAULT_MAX_CHAIN_LENGTH);
        assert!(opts.diff.fallback);
        assert_eq!(opts.diff.comparator, RawTextComparator::Default);
    }

    #[test]
    fn zero_chain_length_is_rejected() {
        parse_err(&["diff", "--max-chain-length", "0", "a", "b"]);
    }

    #[test]
    fn encode_subcommand_maps_correctly() {
        let opts = parse_opts(&[
            "encode",
            "--source",
            "source.bin",
            "--limit",
            "4K",
            "target.bin",
            "out.delta",
        ]);
        assert_eq!(opts.command, Command::Encode);
        assert_eq!(opts.limit, Some(4096));
        assert_eq!(
            opts.source_file.as_deref(),
            Some(std::path::Path::new("source.bin"))
        );
        assert_eq!(opts.input_files, vec![PathBuf::from("target.bin")]);
        assert_eq!(opts.output_file, Some(PathBuf::from("out.delta")));
    }

    #[test]
    fn encode_requires_source() {
        parse_err(&["encode", "target.bin"]);
    }

    #[test]
    fn decode_subcommand_maps_correctly() {
        let opts = parse_opts(&["--quiet", "decode", "-s", "source.bin", "in.delta"]);
        assert_eq!(opts.command, Command::Decode);
        assert!(opts.quiet);
        assert_eq!(opts.input_files, vec![PathBuf::from("in.delta")]);
        assert_eq!(opts.output_file, None);
    }

    #[test]
    fn print_and_index_map() {
        let opts = parse_opts(&["print", "--no-header", "d"]);
        assert_eq!(opts.command, Command::Print);
        assert!(opts.no_header);
        assert_eq!(parse_opts(&["index", "s"]).command, Command::Index);
    }

    #[test]
    fn global_flags() {
        let opts = parse_opts(&["--force", "--json", "index", "s"]);
        assert!(opts.force);
        assert!(opts.json_output);
    }

    #[test]
    fn verbose_is_capped() {
        let verbose = parse_opts(&["--verbose", "--verbose", "--verbose", "index", "s"]);
        assert_eq!(verbose.verbose, 2);
        assert_eq!(log_filter(&verbose), "trace");
        assert_eq!(log_filter(&parse_opts(&["-v", "index", "s"])), "debug");
        assert_eq!(log_filter(&parse_opts(&["index", "s"])), "warn");
        assert_eq!(log_filter(&parse_opts(&["-q", "index", "s"])), "error");
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        parse_err(&["-q", "-v", "index", "s"]);
    }

    #[test]
    fn hunks_render() {
        let a = RawText::new(b"one\ntwo\nthree\n");
        let b = RawText::new(b"one\n2\nthree\nfour");
        let edits = [Edit::new(1, 2, 1, 2), Edit::new(3, 3, 3, 4)];
        let mut out = Vec::new();
        write_hunks(&mut out, &a, &b, &edits).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "@@ -2,1 +2,1 @@\n-two\n+2\n@@ -3,0 +4,1 @@\n+four\n"
        );
    }

    #[test]
    fn empty_hunk_side_names_preceding_line() {
        let a = RawText::new(b"one\ntwo\n");
        let b = RawText::new(b"zero\none\n");
        let edits = [Edit::new(0, 0, 0, 1), Edit::new(1, 2, 2, 2)];
        let mut out = Vec::new();
        write_hunks(&mut out, &a, &b, &edits).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "@@ -0,0 +1,1 @@\n+zero\n@@ -2,1 +2,0 @@\n-two\n"
        );
    }
}
