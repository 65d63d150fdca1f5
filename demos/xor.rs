use evonet::{BreedConfig, Genome, Network, Sgd, Topology, TranscriptionLayout};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SAMPLES: [([f64; 2], [f64; 1]); 4] = [
    ([1.0, 0.0], [1.0]),
    ([1.0, 1.0], [0.0]),
    ([0.0, 1.0], [1.0]),
    ([0.0, 0.0], [0.0]),
];

fn total_cost(network: &mut Network) -> evonet::Result<f64> {
    let mut total = 0.0;
    for (input, target) in &SAMPLES {
        network.feedforward(input)?;
        total += network.cost(target)?;
    }
    Ok(total)
}

fn main() -> evonet::Result<()> {
    env_logger::init();
    let topology = Topology::new(2, 3, 1)?;
    let mut rng = StdRng::seed_from_u64(42);

    // Evolve a starting point: keep the fitter of parent and child.
    let bits = topology.required_bits(TranscriptionLayout::Packed);
    let config = BreedConfig::default();
    let mut best = Genome::random(bits, &mut rng);
    let mut best_cost = total_cost(&mut Network::from_genome(topology, &best, TranscriptionLayout::Packed)?)?;
    for generation in 0..200 {
        let mate = Genome::random(bits, &mut rng);
        let child = best.breed(&mate, &config, &mut rng)?;
        let cost = total_cost(&mut Network::from_genome(topology, &child, TranscriptionLayout::Packed)?)?;
        if cost < best_cost {
            println!("Generation {generation}: cost = {cost:.6}");
            best = child;
            best_cost = cost;
        }
    }

    // Then refine it by gradient descent.
    let mut network = Network::from_genome(topology, &best, TranscriptionLayout::Packed)?;
    let optimizer = Sgd::new(0.5);
    for epoch in 0..10000 {
        for (input, target) in &SAMPLES {
            network.feedforward(input)?;
            network.backpropagate(target)?;
            optimizer.step(&mut network)?;
        }
        if epoch % 1000 == 0 {
            println!("Epoch {epoch}: cost = {:.6}", total_cost(&mut network)?);
        }
    }

    for (input, _) in &SAMPLES {
        println!("Input: {:?} -> Output: {:.4}", input, network.feedforward(input)?[0]);
    }
    Ok(())
}
