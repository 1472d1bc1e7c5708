use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use facescan_core::dataset::infrastructure::dataset_layout::DatasetLayout;
use facescan_core::detection::domain::face_detector::FaceDetector;
use facescan_core::detection::infrastructure::model_resolver;
use facescan_core::detection::infrastructure::onnx_face_detector::{
    OnnxFaceDetector, DEFAULT_CONFIDENCE,
};
use facescan_core::pipeline::batch_logger::LogBatchLogger;
use facescan_core::pipeline::detect_objects_use_case::{DetectConfig, DetectObjectsUseCase};
use facescan_core::pipeline::full_data_use_case::{FullDataConfig, FullDataUseCase};
use facescan_core::pipeline::merge_fragments_use_case::{
    MergeConfig, MergeFragmentsUseCase, RepairSource,
};
use facescan_core::shared::constants::{
    FACE_MODEL_NAME, FACE_MODEL_URL, POD_COUNT_ENV, POD_INDEX_ENV,
};
use facescan_core::shared::partition::PodAssignment;

/// Batch face detection over multi-camera image datasets.
#[derive(Parser)]
#[command(name = "facescan")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one JSON fragment per image under <output-dir>/<object>/<camera>/.
    Detect(DetectArgs),

    /// Detect sampled frames for this pod's objects and write one shard.
    FullData(FullDataArgs),

    /// Merge per-image fragments into one shard for this pod.
    Merge(MergeArgs),
}

#[derive(Args)]
struct DetectArgs {
    /// Dataset root containing <object>/images_lr/<camera>/ directories.
    #[arg(long, alias = "root_dir")]
    root_dir: PathBuf,

    /// Directory receiving the fragment tree.
    #[arg(long, alias = "output_dir")]
    output_dir: PathBuf,

    /// Object ids to process, START inclusive, END exclusive.
    #[arg(long, num_args = 2, value_names = ["START", "END"], allow_negative_numbers = true)]
    range: Option<Vec<i64>>,

    #[command(flatten)]
    detector: DetectorArgs,
}

#[derive(Args)]
struct FullDataArgs {
    /// Dataset root containing <object>/images_lr/<camera>/ directories.
    #[arg(long, alias = "root_dir")]
    root_dir: PathBuf,

    /// Directory receiving full_data_part_<pod>.json.
    #[arg(long, alias = "output_dir")]
    output_dir: PathBuf,

    /// Leave out numeric object ids LO..=HI before partitioning.
    #[arg(long, num_args = 2, value_names = ["LO", "HI"])]
    skip_range: Option<Vec<i64>>,

    #[command(flatten)]
    pod: PodArgs,

    #[command(flatten)]
    detector: DetectorArgs,
}

#[derive(Args)]
struct MergeArgs {
    /// Fragment tree written by `detect`.
    #[arg(long)]
    fragments_dir: PathBuf,

    /// Directory receiving data_part_<pod>.json.
    #[arg(long, alias = "output_dir")]
    output_dir: PathBuf,

    /// Worker threads sharing this pod's objects.
    #[arg(long, default_value = "1")]
    workers: usize,

    /// Dataset root used to re-detect unreadable fragments.
    #[arg(long)]
    source_dir: Option<PathBuf>,

    #[command(flatten)]
    pod: PodArgs,

    #[command(flatten)]
    detector: DetectorArgs,
}

#[derive(Args)]
struct PodArgs {
    /// This pod's ordinal.
    #[arg(long, env = POD_INDEX_ENV, default_value = "0")]
    pod_index: usize,

    /// Total number of pods.
    #[arg(long, env = POD_COUNT_ENV, default_value = "1")]
    pod_count: usize,
}

#[derive(Args)]
struct DetectorArgs {
    /// ONNX face model; downloaded to the user cache when omitted.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Detect(args) => run_detect(args),
        Commands::FullData(args) => run_full_data(args),
        Commands::Merge(args) => run_merge(args),
    }
}

fn run_detect(args: DetectArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate_detector(&args.detector)?;
    let range = args.range.as_deref().map(pair).transpose()?;
    log::info!(
        "Run face detection for images in {}, save results to {}",
        args.root_dir.display(),
        args.output_dir.display()
    );
    if let Some((start, end)) = range {
        log::info!("Object range: {start}-{end}");
    }
    check_dataset(&args.root_dir)?;

    let detector = build_detector(&resolve_model(&args.detector)?, args.detector.confidence)?;
    let mut use_case = DetectObjectsUseCase::new(detector, Box::new(LogBatchLogger::default()));
    let summary = use_case.execute(&DetectConfig {
        root_dir: args.root_dir,
        output_dir: args.output_dir,
        range,
    })?;
    log::info!(
        "Processed {} images across {} objects ({} with a face)",
        summary.images,
        summary.objects,
        summary.faces
    );
    Ok(())
}

fn run_full_data(args: FullDataArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate_detector(&args.detector)?;
    let pod = PodAssignment::new(args.pod.pod_index, args.pod.pod_count)?;
    let skip_range = args.skip_range.as_deref().map(pair).transpose()?;
    check_dataset(&args.root_dir)?;

    let detector = build_detector(&resolve_model(&args.detector)?, args.detector.confidence)?;
    let mut use_case = FullDataUseCase::new(detector, Box::new(LogBatchLogger::default()));
    let summary = use_case.execute(&FullDataConfig {
        root_dir: args.root_dir,
        output_dir: args.output_dir,
        pod,
        skip_range,
    })?;
    log::info!(
        "Wrote {} objects ({} images) to {}",
        summary.objects,
        summary.images,
        summary.shard_path.display()
    );
    Ok(())
}

fn run_merge(args: MergeArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.workers == 0 {
        return Err("--workers must be at least 1".into());
    }
    let pod = PodAssignment::new(args.pod.pod_index, args.pod.pod_count)?;

    let repair = match args.source_dir {
        Some(source_dir) => {
            validate_detector(&args.detector)?;
            let model_path = resolve_model(&args.detector)?;
            let confidence = args.detector.confidence;
            Some(RepairSource {
                layout: DatasetLayout::new(source_dir),
                factory: Box::new(
                    move || -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
                        build_detector(&model_path, confidence)
                    },
                ),
            })
        }
        None => None,
    };

    let mut use_case = MergeFragmentsUseCase::new(repair, Box::new(LogBatchLogger::new(10)));
    let summary = use_case.execute(&MergeConfig {
        fragments_dir: args.fragments_dir,
        output_dir: args.output_dir,
        pod,
        workers: args.workers,
    })?;
    log::info!(
        "Merged {} fragments from {} objects into {} ({} repaired)",
        summary.fragments,
        summary.objects,
        summary.shard_path.display(),
        summary.repaired
    );
    Ok(())
}

fn resolve_model(args: &DetectorArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {FACE_MODEL_NAME}");
    let path = model_resolver::resolve(
        FACE_MODEL_NAME,
        FACE_MODEL_URL,
        args.model.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    Ok(path)
}

fn build_detector(
    model_path: &Path,
    confidence: f64,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    Ok(Box::new(OnnxFaceDetector::new(model_path, confidence)?))
}

fn validate_detector(args: &DetectorArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&args.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            args.confidence
        )
        .into());
    }
    Ok(())
}

/// Fails on a missing or empty dataset before any model is resolved.
fn check_dataset(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    DatasetLayout::new(root).objects()?;
    Ok(())
}

fn pair(values: &[i64]) -> Result<(i64, i64), Box<dyn std::error::Error>> {
    match values {
        [a, b] => Ok((*a, *b)),
        _ => Err(format!("expected two values, got {}", values.len()).into()),
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_detect_accepts_underscore_aliases_and_range() {
        let cli = parse(&[
            "facescan", "detect", "--root_dir", "/data", "--output_dir", "/out", "--range", "100",
            "200",
        ]);
        let Commands::Detect(args) = cli.command else {
            panic!("expected detect");
        };
        assert_eq!(args.root_dir, PathBuf::from("/data"));
        assert_eq!(args.output_dir, PathBuf::from("/out"));
        assert_eq!(args.range, Some(vec![100, 200]));
        assert_eq!(args.detector.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_detect_requires_root_dir() {
        assert!(Cli::try_parse_from(["facescan", "detect", "--output-dir", "/out"]).is_err());
    }

    #[test]
    fn test_range_needs_two_values() {
        assert!(Cli::try_parse_from([
            "facescan", "detect", "--root-dir", "/d", "--output-dir", "/o", "--range", "5"
        ])
        .is_err());
    }

    #[test]
    fn test_full_data_pod_flags() {
        let cli = parse(&[
            "facescan", "full-data", "--root-dir", "/d", "--output-dir", "/o", "--pod-index", "2",
            "--pod-count", "4", "--skip-range", "10001", "100500",
        ]);
        let Commands::FullData(args) = cli.command else {
            panic!("expected full-data");
        };
        assert_eq!(args.pod.pod_index, 2);
        assert_eq!(args.pod.pod_count, 4);
        assert_eq!(args.skip_range, Some(vec![10001, 100500]));
    }

    #[test]
    fn test_pod_flags_fall_back_to_job_env() {
        std::env::set_var(POD_INDEX_ENV, "3");
        std::env::set_var(POD_COUNT_ENV, "8");
        let parsed =
            Cli::try_parse_from(["facescan", "full-data", "--root-dir", "/d", "--output-dir", "/o"]);
        std::env::remove_var(POD_INDEX_ENV);
        std::env::remove_var(POD_COUNT_ENV);

        let Commands::FullData(args) = parsed.unwrap().command else {
            panic!("expected full-data");
        };
        assert_eq!(args.pod.pod_index, 3);
        assert_eq!(args.pod.pod_count, 8);
    }

    #[test]
    fn test_empty_root_fails_before_model_resolution() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let err = run_detect(DetectArgs {
            root_dir: root.path().to_path_buf(),
            output_dir: out.path().to_path_buf(),
            range: None,
            detector: DetectorArgs {
                model: Some(root.path().join("absent.onnx")),
                confidence: DEFAULT_CONFIDENCE,
            },
        })
        .unwrap_err();
        assert!(err.to_string().starts_with("empty root directory"), "{err}");
    }

    #[test]
    fn test_merge_defaults() {
        let cli = parse(&[
            "facescan", "merge", "--fragments-dir", "/f", "--output-dir", "/o", "--pod-index",
            "0", "--pod-count", "1",
        ]);
        let Commands::Merge(args) = cli.command else {
            panic!("expected merge");
        };
        assert_eq!(args.workers, 1);
        assert!(args.source_dir.is_none());
        assert!(args.detector.model.is_none());
    }

    #[test]
    fn test_validate_rejects_confidence_out_of_range() {
        let args = DetectorArgs {
            model: None,
            confidence: 1.5,
        };
        assert!(validate_detector(&args).is_err());
    }

    #[test]
    fn test_pair() {
        assert_eq!(pair(&[3, 9]).unwrap(), (3, 9));
        assert!(pair(&[3]).is_err());
    }

    #[test]
    fn test_merge_of_fragment_tree_through_core() {
        let frags = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let cam = frags.path().join("100").join("cam0");
        std::fs::create_dir_all(&cam).unwrap();
        std::fs::write(cam.join("0005_img.json"), "{}").unwrap();

        run_merge(MergeArgs {
            fragments_dir: frags.path().to_path_buf(),
            output_dir: out.path().to_path_buf(),
            workers: 2,
            source_dir: None,
            pod: PodArgs {
                pod_index: 0,
                pod_count: 1,
            },
            detector: DetectorArgs {
                model: None,
                confidence: DEFAULT_CONFIDENCE,
            },
        })
        .unwrap();

        let shard = std::fs::read_to_string(out.path().join("data_part_0.json")).unwrap();
        assert_eq!(shard, r#"{"100":{"cam0":{"0005_img.json":{}}}}"#);
    }
}
