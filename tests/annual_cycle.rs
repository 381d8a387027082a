use biosim::{
    engine::SystemContext, Animal, Carnivore, FaunaSpec, Island, Parameters, PopulationRecord,
    Species,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const ONE_CELL: &str = "WWW\nWLW\nWWW";

fn one_cell_island(pop: Vec<FaunaSpec>) -> Island {
    let mut island = Island::parse(ONE_CELL).expect("valid map");
    island
        .add_fauna(&[PopulationRecord::new((2, 2), pop)])
        .expect("lowland location");
    island
}

#[test]
fn one_cycle_runs_every_phase_in_order() {
    let mut island =
        one_cell_island(vec![FaunaSpec::new(Species::Herbivore, 5, 20.0).times(50)]);
    let params = Parameters::default();
    let ctx = SystemContext {
        year: 0,
        params: &params,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let reports = island.annual_cycle(&ctx, &mut rng).expect("cycle runs");

    let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "produce_fodder",
            "birth",
            "feeding",
            "move_permits",
            "migration",
            "aging",
            "reset_fodder",
            "death",
        ]
    );
    // Too light to breed, so the year can only remove herbivores.
    assert!(island.counts().herbivores <= 50);
    assert_eq!(island.counts().carnivores, 0);
    assert_eq!(island.cell((1, 1)).fodder(), 0.0);
    let (herbivores, _) = island.census(&params);
    assert!(herbivores.ages.iter().all(|&age| age == 6));
}

#[test]
fn carnivore_death_rate_matches_omega_times_unfitness() {
    let params = Parameters::default();
    let island = one_cell_island(vec![FaunaSpec::new(Species::Carnivore, 2, 5.0).times(20)]);
    let mut rng = ChaCha8Rng::seed_from_u64(77);

    let carnivores: &[Carnivore] = island.cell((1, 1)).carnivores();
    let expected = params.carnivore.omega * (1.0 - carnivores[0].fitness(&params.carnivore));
    let rounds = 1_000;
    let deaths: usize = (0..rounds)
        .map(|_| {
            carnivores
                .iter()
                .filter(|c| c.die(&params.carnivore, &mut rng))
                .count()
        })
        .sum();
    let rate = deaths as f64 / (rounds * carnivores.len()) as f64;
    assert!((rate - expected).abs() < 0.02, "rate {rate}, expected {expected}");
}

#[test]
fn omega_controls_death_at_the_extremes() {
    let mut params = Parameters::default();
    let carnivore = Carnivore::new(2, 5.0);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    params.carnivore.omega = 0.0;
    assert!((0..1_000).all(|_| !carnivore.die(&params.carnivore, &mut rng)));

    params.carnivore.omega = 10.0;
    assert!((0..1_000).all(|_| carnivore.die(&params.carnivore, &mut rng)));
}

#[test]
fn fauna_counts_are_visible_before_any_cycle() {
    let mut island = Island::parse("WWWW\nWLHW\nWWWW").expect("valid map");
    let added = island
        .add_fauna(&[
            PopulationRecord::new(
                (2, 2),
                vec![
                    FaunaSpec::new(Species::Herbivore, 3, 12.0).times(7),
                    FaunaSpec::new(Species::Carnivore, 3, 12.0),
                ],
            ),
            PopulationRecord::new((2, 3), vec![FaunaSpec::new(Species::Herbivore, 1, 9.0)]),
        ])
        .expect("valid records");
    assert_eq!(added.herbivores, 8);
    assert_eq!(added.carnivores, 1);
    assert_eq!(island.counts(), added);
}

#[test]
fn starving_island_dies_out() {
    let mut island = Island::parse("WWW\nWDW\nWWW").expect("valid map");
    island
        .add_fauna(&[PopulationRecord::new(
            (2, 2),
            vec![FaunaSpec::new(Species::Herbivore, 50, 1.0).times(30)],
        )])
        .expect("desert is habitable");
    let params = Parameters::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for year in 0..40 {
        let ctx = SystemContext {
            year,
            params: &params,
        };
        island.annual_cycle(&ctx, &mut rng).expect("cycle runs");
    }
    assert_eq!(island.counts().total(), 0);
}
