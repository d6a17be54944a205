//! Parameter sweep runner.
//!
//! Runs repeated annealings for every instance file × cooling schedule
//! × iterations-per-temperature combination and writes the results in
//! the formats the viewer loads: one distance log per configuration
//! (`<stem>_<schedule>_on_temp_<n>.txt`, one final distance per
//! repeat) plus the first repeat's full trace (`results_<id>.txt`).
//!
//! Usage: `sweep <out-dir> <instance.txt>...`

use std::collections::HashMap;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use anneal_log_viewer::core::annealer::{Annealer, AnnealerConfig};
use anneal_log_viewer::core::cooling::CoolingSchedule;
use anneal_log_viewer::core::instance::{distance_matrix, load_instance};
use anneal_log_viewer::core::loader::{write_distances, write_run_log};
use anneal_log_viewer::core::run_log::RunSample;

/// Independent runs per configuration.
const REPEATS: usize = 20;

/// Iteration budget of every run.
const TOTAL_ITERATIONS: usize = 200_000;

/// Starting temperature of every run.
const INITIAL_TEMPERATURE: f64 = 800.0;

/// Temperature floor of every run.
const FINAL_TEMPERATURE: f64 = 1e-6;

/// Iterations-per-temperature settings covered by the sweep.
const ITERS_PER_TEMP: &[usize] = &[1, 10];

/// Trace sampling stride for the `results_<id>.txt` files.
const TRACE_LOG_EVERY: usize = 100;

/// Worker thread count.
const WORKERS: usize = 8;

/// One unit of work: a single repeat of one configuration.
struct Job {
    config_id: usize,
    repeat: usize,
    file_stem: String,
    matrix: Arc<Vec<Vec<f64>>>,
    schedule: CoolingSchedule,
    iters_per_temp: usize,
}

/// What a finished job reports back.
struct JobResult {
    config_id: usize,
    distance_file: String,
    final_distance: f64,
    trace: Option<Vec<RunSample>>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("sweep failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        return Err("usage: sweep <out-dir> <instance.txt>...".into());
    }

    let out_dir = PathBuf::from(&args[0]);
    std::fs::create_dir_all(&out_dir)?;

    let jobs = build_jobs(&args[1..])?;
    let total_jobs = jobs.len();
    log::info!(
        "sweep: {} jobs across {} workers, {} iterations each",
        total_jobs,
        WORKERS,
        TOTAL_ITERATIONS
    );

    let (results_tx, results_rx) = channel::<JobResult>();
    let job_queue = Arc::new(Mutex::new(make_job_receiver(jobs)));

    let mut handles = Vec::with_capacity(WORKERS);
    for _ in 0..WORKERS {
        let queue = Arc::clone(&job_queue);
        let results = results_tx.clone();
        handles.push(thread::spawn(move || worker_loop(queue, results)));
    }
    // Workers hold the remaining senders; dropping ours lets the
    // collection loop end when they finish.
    drop(results_tx);

    collect_results(results_rx, &out_dir, total_jobs)?;

    for handle in handles {
        let _ = handle.join();
    }

    Ok(())
}

/// Expand instance files into the full job grid.
fn build_jobs(instance_paths: &[String]) -> Result<Vec<Job>, Box<dyn Error>> {
    let mut jobs = Vec::new();
    let mut config_id = 0;

    for arg in instance_paths {
        let path = Path::new(arg);
        let nodes = load_instance(path)?;
        let matrix = Arc::new(distance_matrix(&nodes));
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "instance".to_string());
        log::info!("instance {}: {} cities", stem, nodes.len());

        for &schedule in CoolingSchedule::ALL {
            for &iters_per_temp in ITERS_PER_TEMP {
                for repeat in 0..REPEATS {
                    jobs.push(Job {
                        config_id,
                        repeat,
                        file_stem: stem.clone(),
                        matrix: Arc::clone(&matrix),
                        schedule,
                        iters_per_temp,
                    });
                }
                config_id += 1;
            }
        }
    }

    Ok(jobs)
}

/// Feed a job list through a channel so workers can pull from it.
fn make_job_receiver(jobs: Vec<Job>) -> Receiver<Job> {
    let (tx, rx) = channel();
    for job in jobs {
        // Send cannot fail while we hold the receiver.
        let _ = tx.send(job);
    }
    rx
}

/// Pull jobs until the queue is drained.
fn worker_loop(queue: Arc<Mutex<Receiver<Job>>>, results: Sender<JobResult>) {
    loop {
        let job = match queue.lock() {
            Ok(guard) => guard.recv(),
            Err(_) => break,
        };
        let Ok(job) = job else { break };

        match run_job(&job) {
            Ok(result) => {
                if results.send(result).is_err() {
                    break;
                }
            }
            Err(e) => {
                log::error!(
                    "config {} repeat {} failed: {}",
                    job.config_id,
                    job.repeat,
                    e
                );
            }
        }
    }
}

/// Execute one annealing run.
fn run_job(job: &Job) -> Result<JobResult, String> {
    let config = AnnealerConfig::default()
        .with_initial_temperature(INITIAL_TEMPERATURE)
        .with_final_temperature(FINAL_TEMPERATURE)
        .with_total_iterations(TOTAL_ITERATIONS)
        .with_iterations_per_temperature(job.iters_per_temp)
        .with_cooling(job.schedule)
        .with_seed((job.config_id * 1000 + job.repeat) as u64)
        .with_log_every(TRACE_LOG_EVERY);

    let mut annealer = Annealer::new(job.matrix.as_ref().clone(), config)?;

    // Only the first repeat keeps its trace; the rest just contribute
    // a final distance.
    let mut trace = if job.repeat == 0 { Some(Vec::new()) } else { None };
    annealer.run(|sample| {
        if let Some(trace) = trace.as_mut() {
            trace.push(sample);
        }
    });

    Ok(JobResult {
        config_id: job.config_id,
        distance_file: format!(
            "{}_{}_on_temp_{}.txt",
            job.file_stem,
            job.schedule.name(),
            job.iters_per_temp
        ),
        final_distance: annealer.current_distance(),
        trace,
    })
}

/// Gather results, writing traces as they arrive and the per-
/// configuration distance files once everything is in.
fn collect_results(
    results: Receiver<JobResult>,
    out_dir: &Path,
    total_jobs: usize,
) -> Result<(), Box<dyn Error>> {
    let mut distances: HashMap<String, Vec<f64>> = HashMap::new();
    let mut finished = 0usize;

    for result in results.iter() {
        if let Some(trace) = &result.trace {
            let path = out_dir.join(format!("results_{}.txt", result.config_id));
            let mut writer = BufWriter::new(File::create(&path)?);
            write_run_log(&mut writer, trace)?;
            log::info!("wrote trace {}", path.display());
        }

        distances
            .entry(result.distance_file.clone())
            .or_default()
            .push(result.final_distance);

        finished += 1;
        if finished % REPEATS == 0 {
            log::info!("{} / {} runs finished", finished, total_jobs);
        }
    }

    for (name, values) in &distances {
        let path = out_dir.join(name);
        let mut writer = BufWriter::new(File::create(&path)?);
        write_distances(&mut writer, values)?;
        log::info!("wrote {} distances to {}", values.len(), path.display());
    }

    Ok(())
}
