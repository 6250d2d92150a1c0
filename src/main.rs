use clap::Parser;
use env_logger::Env;
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use xwave::{
    console::{show_intro, Args, PartialArgs, Task},
    corrector::{CorrectionMethod, CorrectorJob},
    error::XwResult,
    export::{write_columns, write_matrix},
    gsm::{GsmSourceSynthesizer, SynthesizerConfig},
    materials::ScatteringFactorDatabase,
    utils::usize_to_f64,
    wavefront::Wavefront1D,
};

fn output_path(args: &Args, suffix: &str) -> PathBuf {
    let stem = args
        .file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("xwave");
    args.output_directory.join(format!("{stem}_{suffix}.dat"))
}

fn write_wavefront(path: &Path, wavefront: &Wavefront1D) -> XwResult<()> {
    write_columns(
        path,
        &[
            wavefront.abscissas(),
            &wavefront.intensity(),
            &wavefront.phase(true, None),
        ],
    )
}

fn run_corrector(args: &Args) -> XwResult<()> {
    let mut job = CorrectorJob::from_file(&args.file_path)?;
    if job.profile_file.is_none() && job.correction_method == CorrectionMethod::FocusToWaist {
        job.profile_file = Some(output_path(args, "profile"));
    }
    let mut database = ScatteringFactorDatabase::new();
    if let Some(tables) = &args.scattering_tables {
        database.load_tables_from_file(tables)?;
    }
    let output = job.run(&database)?;
    write_wavefront(&output_path(args, "wavefront"), &output.emitted_wavefront)?;
    write_wavefront(
        &output_path(args, "target"),
        &output.correction.target_wavefront,
    )
}

fn run_synthesizer(args: &Args) -> XwResult<()> {
    let config = SynthesizerConfig::from_file(&args.file_path)?;
    let mut synthesizer = GsmSourceSynthesizer::new();
    let result = synthesizer.synthesize(&config)?;
    write_matrix(
        &output_path(args, "intensity"),
        &result.wavefront.intensity(),
    )?;
    let occupation = nalgebra::DVector::from_vec(result.selection.cumulated_occupation.clone());
    let index = occupation.map_with_location(|i, _, _| usize_to_f64(i));
    write_columns(&output_path(args, "occupation"), &[&index, &occupation])?;
    write_matrix(
        &output_path(args, "eigenvalues"),
        &result.selection.eigenvalue_map,
    )
}

fn run() -> XwResult<()> {
    let args = Args::try_from(PartialArgs::parse())?;
    show_intro();
    match args.task {
        Task::Correct => run_corrector(&args),
        Task::Gsm => run_synthesizer(&args),
    }
}

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
