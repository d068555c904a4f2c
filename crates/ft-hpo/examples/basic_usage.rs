use ft_hpo::*;
use ft_types::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Fine-tuning HPO basic usage example");

    let composer = SpaceComposer::default();
    let request = SpaceRequest::new("electra", "base", "glue").with_subdataset("rte");

    // Union of the published grids for electra, roberta and bert
    let union = composer.compose_named("uni", &request, &ComposeArgs::default())?;
    println!("Grid union has {} hyperparameters", union.len());
    for (name, entry) in union.iter() {
        println!("  {name}: {}", serde_json::to_string(entry)?);
    }

    // Same union with the learning rate bounded
    let mut bound = BoundSpec::new();
    bound.insert("learning_rate".to_string(), Bound::new(Some(1e-5), Some(1e-4)));
    let args = ComposeArgs::default().with_bound(bound);
    let bounded = composer.compose(SpaceMode::BoundedGridUnion, &request, &args)?;
    println!(
        "Bounded learning rates: {}",
        serde_json::to_string(&bounded.get("learning_rate"))?
    );

    // Pick a cost-aware searcher for the bounded space
    match select("bs", "default", &bounded, AlgorithmArgs::new())? {
        Selection::Built { instance, dropped } => {
            println!("Search algorithm: {}", serde_json::to_string(&instance)?);
            println!("Dropped arguments: {dropped:?}");
        }
        Selection::External(algo) => println!("{algo} is set up by the tuning runtime"),
        Selection::Unavailable { algorithm, failure } => {
            println!("{algorithm} unavailable: {failure}")
        }
    }

    // Enumerate a small grid explicitly
    let grid = grid_config(&generic_grid_space())?;
    let configs = grid_to_list(&grid);
    println!("Generic grid expands to {} configurations", configs.len());

    println!("Example completed successfully!");
    Ok(())
}
