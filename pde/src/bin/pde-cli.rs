//! Example CLI: assembles and solves a manufactured 1D Poisson problem,
//! mirroring the teacher workspace's `pa-bin` example-binary pattern
//! (`clap` derive `Cli`, flattened sub-args, `tracing-subscriber` for
//! logging) but over this crate's own solver stack instead of an
//! alignment pipeline.

use clap::{Parser, ValueEnum};
use pde::equation::{compile, EqnSet, Equation};
use pde::expr::{D2SecondOrderCentered, NamedFn, Scale, StencilLeaf};
use pde::field::{BcSpec, Field, Location, StencilRow};
use pde::mesh::CartesianMesh;
use pde::solver::{BiCgStabSolver, GmresSolver, PcgSolver, SolverBackend, SolverParams};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum BcKind {
    Dirichlet,
    Periodic,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SolverKind {
    Cg,
    Gmres,
    Bicgstab,
}

/// Assemble and solve a manufactured 1D Poisson problem `-u'' = f`.
#[derive(Parser)]
#[clap(author, about)]
struct Cli {
    /// Number of mesh nodes along the single axis.
    #[arg(long, default_value_t = 65)]
    n: usize,

    /// Boundary condition applied at both ends.
    #[arg(long, value_enum, default_value_t = BcKind::Dirichlet)]
    bc: BcKind,

    /// Krylov method to solve the assembled system with.
    #[arg(long, value_enum, default_value_t = SolverKind::Cg)]
    solver: SolverKind,

    /// Relative residual tolerance.
    #[arg(long, default_value_t = 1e-10)]
    tol: f64,

    /// Maximum solver iterations.
    #[arg(long, default_value_t = 500)]
    max_iter: usize,

    /// Write the assembled matrix/rhs to `{dump}_A.mat`/`{dump}_b.vec`.
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    let mesh = Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [cli.n], 1).expect("valid mesh dims"));
    let (bc_start, bc_end) = match cli.bc {
        BcKind::Dirichlet => (BcSpec::dirichlet(0.0), BcSpec::dirichlet(0.0)),
        BcKind::Periodic => (BcSpec::Periodic, BcSpec::Periodic),
    };
    let u = Arc::new(Field::new(mesh.clone(), "u", [Location::Center], [bc_start], [bc_end]));

    let lhs = {
        let leaf = StencilLeaf::new(u.clone(), 0);
        let d2: D2SecondOrderCentered<1, StencilRow<1>> = D2SecondOrderCentered::new(0, mesh.clone(), Location::Center, Box::new(leaf));
        Box::new(Scale::constant(-1.0, Box::new(d2)))
    };
    let rhs = Box::new(NamedFn::<1, StencilRow<1>>::new("f", mesh, std::sync::Arc::new(|x: [f64; 1]| {
        let pi = std::f64::consts::PI;
        (2.0 * pi * x[0]).sin() * (2.0 * pi).powi(2)
    })));

    let mut eqnset = EqnSet::new(vec![Equation::new(lhs, rhs)], vec![u]);
    let csr = compile(&mut eqnset).expect("equation compiles to a consistent CSR");
    tracing::info!(rows = csr.nrows(), nnz = csr.nnz(), "assembled system");

    if let Some(path) = &cli.dump {
        pde::solver::write_matrix_market(&csr, &csr.rhs.clone(), path).expect("dump writes successfully");
    }

    let x0 = vec![0.0; csr.nrows()];
    let params = SolverParams {
        tol: cli.tol,
        max_iter: cli.max_iter,
        dump_path: cli.dump.clone(),
        ..Default::default()
    };
    let b = csr.rhs.clone();

    let result = match cli.solver {
        SolverKind::Cg => {
            let mut solver = PcgSolver { params };
            solver.solve(&csr, &b, &x0)
        }
        SolverKind::Gmres => {
            let mut solver = GmresSolver { params };
            solver.solve(&csr, &b, &x0)
        }
        SolverKind::Bicgstab => {
            let mut solver = BiCgStabSolver { params };
            solver.solve(&csr, &b, &x0)
        }
    };

    match result {
        Ok((x, stats)) => {
            println!("converged in {} iterations, final residual {:e}", stats.iters, stats.final_res);
            println!("{:?}", x);
        }
        Err(err) => {
            eprintln!("solve did not converge: {err}");
            std::process::exit(1);
        }
    }
}
