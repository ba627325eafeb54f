use std::env;
use std::fs::File;
use std::io::Cursor;
use std::process;

use gblas::{
    breadth_first_search, read_matrix, reduced, skew_symmetric, symmetric, Context, GraphError,
    Matrix, SparseMatrixCSR,
};

const SAMPLE: &str = "0\t0\t10\n0\t1\t2\n1\t0\t2\n1\t1\t3\n1\t2\t1\n2\t1\t1\n2\t2\t8\n";

fn load(args: &[String]) -> Result<SparseMatrixCSR<f64>, GraphError> {
    match args {
        [path, rows, cols] => {
            let parse = |s: &String| {
                s.parse::<usize>().map_err(|e| GraphError::Parse {
                    line: 0,
                    message: format!("invalid dimension {:?}: {}", s, e),
                })
            };
            let mut m = SparseMatrixCSR::new(parse(rows)?, parse(cols)?);
            let records = read_matrix(File::open(path)?, &mut m)?;
            println!("Read {} records from {}", records, path);
            Ok(m)
        }
        _ => {
            println!("Usage: gblas <matrix.tsv> <rows> <cols>; using the built-in sample");
            let mut m = SparseMatrixCSR::new(3, 3);
            read_matrix(Cursor::new(SAMPLE), &mut m)?;
            Ok(m)
        }
    }
}

fn run(args: &[String]) -> Result<(), GraphError> {
    let a = load(args)?;

    println!("\nMatrix A ({}x{}, {} non-zeros):", a.rows(), a.columns(), a.nnz());
    println!("{:?}", a);

    println!("\nSymmetric: {}", symmetric(&a));
    println!("Skew-symmetric: {}", skew_symmetric(&a));

    println!("\nReduced row echelon form:");
    let rref = reduced(&a)?;
    for r in 0..rref.rows() {
        println!("  {:?}", rref.row_to_array(r));
    }

    if a.rows() == a.columns() && a.rows() > 0 {
        let visited = breadth_first_search(&Context::background(), &a, 0, |_| false)?;
        println!("\nReachable from vertex 0: {:?}", visited);
    }

    Ok(())
}

fn main() {
    println!("gblas {}: sparse linear algebra over semirings", gblas::VERSION);

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
