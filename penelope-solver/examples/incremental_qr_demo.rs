//! Incremental sparse QR on a 1-D pose chain
//!
//! A minimal smoothing problem that exercises the factor the way a SLAM
//! back-end does: one pose variable per step, an odometry measurement
//! linking consecutive poses, and occasional loop closures linking a pose
//! back to a random earlier one. Each step appends a state column and one
//! or two measurement rows, then re-triangulates.
//!
//! An odometry row only touches the last two variables, so rotating it into
//! the factor costs a couple of rotations. A loop closure touches a variable
//! far to the left, and the rotations sweep from there to the right edge,
//! leaving fill-in behind; the final pattern makes this visible.

use clap::Parser;
use penelope_solver::SparseMatrix;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Incremental sparse QR demo
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of poses in the chain
    #[arg(long, default_value_t = 40)]
    poses: usize,

    /// Probability of a loop closure at each step
    #[arg(long, default_value_t = 0.15)]
    closure_prob: f64,

    /// RNG seed
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Print the final sparsity pattern
    #[arg(long)]
    pattern: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();
    let args = Args::parse();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut r = SparseMatrix::new(0, 0);

    // prior anchoring pose 0
    r.append_new_rows(1);
    r.append_new_cols(1);
    r.append_in_row(0, 0, 1.0);

    let mut total_rotations = 0;
    let mut closures = 0;

    for pose in 1..args.poses {
        // new state variable plus the odometry row x_pose - x_{pose-1}
        r.append_new_cols(1);
        r.append_new_rows(1);
        let row = r.num_rows() - 1;
        r.append_in_row(row, pose - 1, -1.0);
        r.append_in_row(row, pose, 1.0);

        if pose > 2 && rng.gen::<f64>() < args.closure_prob {
            let target = rng.gen_range(0..pose - 1);
            r.append_new_rows(1);
            let row = r.num_rows() - 1;
            r.append_in_row(row, target, -1.0);
            r.append_in_row(row, pose, 1.0);
            closures += 1;
        }

        let rotations = r.triangulate();
        total_rotations += rotations;
        if rotations > 0 {
            println!(
                "pose {:3}: {} rotations, factor {}",
                pose, rotations, r
            );
        }
    }

    println!();
    println!(
        "{} poses, {} loop closures, {} rotations total, final factor {}",
        args.poses, closures, total_rotations, r
    );
    assert!(r.is_upper_triangular());

    if args.pattern {
        println!();
        let mut out = std::io::stdout().lock();
        r.write_pattern(&mut out)?;
    }

    Ok(())
}
