use lloyd::dataset::matrix_from_rows;
use lloyd::distance::euclidean;
use lloyd::synthetic::gaussian_blobs;
use lloyd::{kmeans, Float, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let centers = vec![
        vec![30.0, 40.0],
        vec![10.0, 25.0],
        vec![40.0, 20.0],
        vec![60.0, 30.0],
        vec![20.0, 70.0],
    ];

    let truth = matrix_from_rows(&centers)?;

    let mut rng = StdRng::seed_from_u64(1);
    let blobs = gaussian_blobs(&centers, 4.0, 50, true, &mut rng)?;
    info!(points = blobs.points.nrows(), "generated five gaussian blobs");

    for iterations in [1, 5] {
        let clustering = kmeans(&blobs.points, 5, iterations, &mut rng)?;
        info!(
            iterations,
            converged = clustering.converged,
            inertia = clustering.inertia,
            "clustered"
        );

        println!("{}", clustering.centroids);
        println!("{:?}", clustering.assignments);

        for c in 0..clustering.centroids.nrows() {
            let miss = (0..truth.nrows())
                .map(|b| euclidean(&truth, b, &clustering.centroids, c))
                .fold(Float::INFINITY, Float::min);
            println!("centroid {c}: {miss:.3} from the nearest blob center");
        }
    }

    Ok(())
}
