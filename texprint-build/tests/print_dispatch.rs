#![cfg(unix)]

mod support;

use std::fs;
use std::path::{Path, PathBuf};

use support::{capture_logs, compiler_config, quoted, Bench, MAKE_PDF};
use texprint_build::{
    compile_template_and_print, BuildError, CompileRequest, Compiler, DeviceSelection,
    PipelineError, PrintJob, Printer,
};
use texprint_core::TexConfig;
use texprint_renderer::{TemplateContext, TemplateEngine};

/// Fake print command writing one argument per line to `out`.
fn recording_printer(bench: &Bench, name: &str, out: &Path) -> PathBuf {
    bench.tool(
        name,
        &format!(
            "for a in \"$@\"; do printf '%s\\n' \"$a\"; done > '{}'",
            out.display()
        ),
    )
}

fn recorded_args(out: &Path) -> Vec<String> {
    fs::read_to_string(out)
        .expect("recorded args")
        .lines()
        .map(str::to_string)
        .collect()
}

fn print_config(print_command: String, printer: Option<&str>) -> TexConfig {
    TexConfig {
        print_command,
        printer: printer.map(str::to_string),
        ..TexConfig::default()
    }
}

#[test]
fn device_and_path_with_spaces_and_quotes_stay_single_arguments() {
    let bench = Bench::new();
    let out = bench.path("args");
    let lp = recording_printer(&bench, "lp", &out);
    let pdf = bench.path("my \"odd\" file's.pdf");
    fs::write(&pdf, "PDF").expect("pdf");

    let config = TexConfig {
        print_options: "-o 'media=A4 Plus'".to_string(),
        ..print_config(quoted(&lp), Some("front desk 'B'"))
    };
    let job = PrintJob::build(&config, "-n 2", &pdf).expect("job");
    assert!(matches!(job.device(), DeviceSelection::Flag { flag: "-d", .. }));
    job.run().expect("print");

    assert_eq!(
        recorded_args(&out),
        vec![
            "-d".to_string(),
            "front desk 'B'".to_string(),
            "-o".to_string(),
            "media=A4 Plus".to_string(),
            "-n".to_string(),
            "2".to_string(),
            pdf.display().to_string(),
        ]
    );
}

#[test]
fn exit_two_is_a_print_error_carrying_stderr() {
    let bench = Bench::new();
    let lpr = bench.tool("lpr", "echo 'lpr: printer on fire' >&2\nexit 2");
    let job = PrintJob::build(
        &print_config(quoted(&lpr), Some("hp1")),
        "",
        Path::new("/tmp/texput.pdf"),
    )
    .expect("job");

    let err = job.run().unwrap_err();
    match &err {
        BuildError::Print { command, stderr } => {
            assert!(command.contains("-P hp1"), "got: {command}");
            assert_eq!(stderr, "lpr: printer on fire\n");
        }
        other => panic!("expected print error, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.starts_with("printing with '"), "got: {message}");
    assert!(message.contains("lpr: printer on fire"), "got: {message}");
}

#[test]
fn stderr_on_success_is_not_an_error() {
    let bench = Bench::new();
    let lp = bench.tool("lp", "echo 'lp: deprecated option' >&2\nexit 0");
    let job = PrintJob::build(&print_config(quoted(&lp), None), "", Path::new("/tmp/x.pdf"))
        .expect("job");
    job.run().expect("stderr alone is only a warning");
}

#[test]
fn unknown_print_command_ignores_the_device() {
    let bench = Bench::new();
    let out = bench.path("args");
    let spool = recording_printer(&bench, "spool", &out);
    let job = PrintJob::build(
        &print_config(quoted(&spool), Some("hp1")),
        "",
        Path::new("/tmp/doc.pdf"),
    )
    .expect("job");
    assert!(matches!(job.device(), DeviceSelection::Unsupported { .. }));
    job.run().expect("print");
    assert_eq!(recorded_args(&out), vec!["/tmp/doc.pdf".to_string()]);
}

#[test]
fn printer_prints_the_live_artifact() {
    let bench = Bench::new();
    let out = bench.path("printed");
    let lpr = bench.tool("lpr", &format!("cat \"$3\" > '{}'", out.display()));
    let tex = bench.tool("tex", MAKE_PDF);
    let config = TexConfig {
        print_command: quoted(&lpr),
        printer: Some("hp1".to_string()),
        ..compiler_config(&tex)
    };

    let printer = Printer::new("");
    Compiler::new(&config)
        .with_scratch_root(bench.scratch.path())
        .process(&CompileRequest::new("\\relax"), |artifact| {
            printer.print(artifact, &config)
        })
        .expect("print");

    assert_eq!(fs::read_to_string(out).expect("printed"), "PDF-fake\n");
    assert_eq!(bench.leftover_workspaces(), 0);
}

/// Compile a fake document and print it through [`Printer::print`],
/// returning the result and everything logged on the way.
fn print_through_printer(
    bench: &Bench,
    print_command: &Path,
    printer: Option<&str>,
) -> (Result<(), BuildError>, String) {
    let tex = bench.tool("tex", MAKE_PDF);
    let config = TexConfig {
        print_command: quoted(print_command),
        printer: printer.map(str::to_string),
        ..compiler_config(&tex)
    };
    let printer = Printer::new("");
    capture_logs(|| {
        Compiler::new(&config)
            .with_scratch_root(bench.scratch.path())
            .process(&CompileRequest::new("\\relax"), |artifact| {
                printer.print(artifact, &config)
            })
    })
}

fn warnings(logs: &str) -> Vec<&str> {
    logs.lines().filter(|line| line.contains("WARN")).collect()
}

#[test]
fn unknown_print_command_with_printer_warns_and_runs_unchanged() {
    let bench = Bench::new();
    let out = bench.path("args");
    let spool = recording_printer(&bench, "spool", &out);

    let (result, logs) = print_through_printer(&bench, &spool, Some("hp1"));
    result.expect("print");

    let warnings = warnings(&logs);
    assert_eq!(warnings.len(), 1, "logs: {logs}");
    assert!(warnings[0].contains("printer setting ignored"), "logs: {logs}");
    assert!(warnings[0].contains("hp1"), "logs: {logs}");
    let args = recorded_args(&out);
    assert_eq!(args.len(), 1, "got: {args:?}");
    assert!(args[0].ends_with("/texput.pdf"), "got: {args:?}");
}

#[test]
fn stderr_on_success_logs_a_warning() {
    let bench = Bench::new();
    let lp = bench.tool("lp", "echo 'lp: deprecated option' >&2\nexit 0");

    let (result, logs) = print_through_printer(&bench, &lp, Some("hp1"));
    result.expect("stderr alone is only a warning");

    let warnings = warnings(&logs);
    assert_eq!(warnings.len(), 1, "logs: {logs}");
    assert!(warnings[0].contains("wrote to stderr"), "logs: {logs}");
    assert!(warnings[0].contains("lp: deprecated option"), "logs: {logs}");
}

#[test]
fn whitespace_only_stderr_still_warns() {
    let bench = Bench::new();
    let lp = bench.tool("lp", "printf ' \\n' >&2");

    let (result, logs) = print_through_printer(&bench, &lp, None);
    result.expect("print");

    let warnings = warnings(&logs);
    assert_eq!(warnings.len(), 1, "logs: {logs}");
    assert!(warnings[0].contains("wrote to stderr"), "logs: {logs}");
}

#[test]
fn quiet_known_print_command_does_not_warn() {
    let bench = Bench::new();
    let out = bench.path("args");
    let lpr = recording_printer(&bench, "lpr", &out);

    let (result, logs) = print_through_printer(&bench, &lpr, Some("hp1"));
    result.expect("print");

    assert!(warnings(&logs).is_empty(), "logs: {logs}");
    assert!(logs.contains("sent to printer"), "logs: {logs}");
    assert_eq!(&recorded_args(&out)[..2], ["-P", "hp1"]);
}

#[test]
fn compile_template_and_print_passes_extra_options_last_before_path() {
    let bench = Bench::new();
    let out = bench.path("args");
    let lp = recording_printer(&bench, "lp", &out);
    let tex = bench.tool("tex", MAKE_PDF);
    let config = TexConfig {
        print_command: quoted(&lp),
        print_options: "-o sides=one-sided".to_string(),
        ..compiler_config(&tex)
    };
    let engine = TemplateEngine::from_raw([("doc.tex", "{{ title }}")]).expect("engine");
    let mut ctx = TemplateContext::new();
    ctx.insert("title", &"Report").expect("insert");

    compile_template_and_print(&engine, "doc.tex", &ctx, &config, "-n 3").expect("print");

    let args = recorded_args(&out);
    assert_eq!(&args[..4], ["-o", "sides=one-sided", "-n", "3"]);
    assert_eq!(args.len(), 5);
    assert!(args[4].ends_with("/texput.pdf"), "got: {args:?}");
}

#[test]
fn print_failure_surfaces_through_the_pipeline() {
    let bench = Bench::new();
    let lp = bench.tool("lp", "echo 'no such queue' >&2\nexit 1");
    let tex = bench.tool("tex", MAKE_PDF);
    let config = TexConfig {
        print_command: quoted(&lp),
        ..compiler_config(&tex)
    };
    let engine = TemplateEngine::from_raw([("doc.tex", "x")]).expect("engine");

    let err = compile_template_and_print(&engine, "doc.tex", &TemplateContext::new(), config, "")
        .unwrap_err();
    assert!(
        matches!(err, PipelineError::Build(BuildError::Print { ref stderr, .. }) if stderr == "no such queue\n"),
        "got {err:?}"
    );
}
