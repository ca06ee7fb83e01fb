use potion_mixer_core::{
    Category, Event, IngredientDef, Ledger, LevelDef, LevelProgress, MixOutcome, MixingSession,
    RecipeBook, RecipeRow, RecipeTable, SessionError, Station, StationResolver,
};

fn row(inputs: &[&str], output: &str) -> RecipeRow {
    RecipeRow {
        inputs: inputs.iter().map(|value| value.to_string()).collect(),
        outputs: vec![Some(output.to_string())],
    }
}

fn book() -> RecipeBook {
    vec![
        RecipeTable::from_rows(Station::Mortar, vec![row(&["Root"], "Root Powder")])
            .expect("mortar"),
        RecipeTable::from_rows(
            Station::Cauldron,
            vec![
                row(&["Water", "Root", "Glow"], "Minor Healing Potion"),
                row(&["Water", "Root Powder", "Glow"], "Greater Healing Potion"),
            ],
        )
        .expect("cauldron"),
    ]
    .into_iter()
    .collect()
}

fn ingredient(name: &str, category: Category, count: u32) -> IngredientDef {
    IngredientDef {
        name: name.to_string(),
        category,
        count,
    }
}

fn level() -> LevelDef {
    LevelDef {
        level: 3,
        objective: "Brew a Greater Healing Potion".to_string(),
        target_potion: Some("Greater Healing Potion".to_string()),
        stations: vec![Station::Mortar, Station::Cauldron],
        ingredients: vec![
            ingredient("Water", Category::Fluid, 2),
            ingredient("Root", Category::Solid, 2),
            ingredient("Glow", Category::Essence, 2),
        ],
    }
}

#[test]
fn placing_reserves_and_taking_releases() {
    let book = book();
    let mut session = MixingSession::new(level(), StationResolver::new(&book));

    session.place(Station::Mortar, 0, "Root").expect("place");
    assert_eq!(session.inventory().count("Root", Category::Solid), 1);
    assert_eq!(
        session
            .reservation(Station::Mortar)
            .expect("reservation")
            .held("Root", Category::Solid),
        1
    );
    assert_eq!(
        session.slots(Station::Mortar),
        Some(&[Some("Root".to_string())][..])
    );

    let taken = session.take(Station::Mortar, 0).expect("take");
    assert_eq!(taken, "Root");
    assert_eq!(session.inventory().count("Root", Category::Solid), 2);
    assert!(session
        .reservation(Station::Mortar)
        .expect("reservation")
        .is_empty());
    assert_eq!(
        session.take(Station::Mortar, 0),
        Err(SessionError::SlotEmpty {
            station: Station::Mortar,
            slot: 0,
        })
    );
}

#[test]
fn two_stations_cannot_spend_the_same_unit() {
    let book = book();
    let mut level = level();
    level.ingredients = vec![
        ingredient("Water", Category::Fluid, 1),
        ingredient("Root", Category::Solid, 1),
        ingredient("Glow", Category::Essence, 1),
    ];
    let mut session = MixingSession::new(level, StationResolver::new(&book));

    session.place(Station::Mortar, 0, "Root").expect("place");
    assert_eq!(
        session.place(Station::Cauldron, 1, "Root"),
        Err(SessionError::NotAvailable {
            item: "Root".to_string(),
            category: Category::Solid,
        })
    );
}

#[test]
fn placement_checks_slot_category() {
    let book = book();
    let mut session = MixingSession::new(level(), StationResolver::new(&book));

    assert_eq!(
        session.place(Station::Cauldron, 0, "Root"),
        Err(SessionError::WrongCategory {
            item: "Root".to_string(),
            expected: Category::Fluid,
            found: Category::Solid,
        })
    );
    assert_eq!(
        session.place(Station::Cauldron, 3, "Water"),
        Err(SessionError::SlotOutOfRange {
            station: Station::Cauldron,
            slot: 3,
        })
    );
    assert_eq!(
        session.place(Station::Retort, 0, "Water"),
        Err(SessionError::StationNotInLevel(Station::Retort))
    );

    session.place(Station::Cauldron, 0, "Water").expect("place");
    let err = session
        .place(Station::Cauldron, 0, "Water")
        .expect_err("occupied");
    assert_eq!(err.to_string(), "Cauldron slot 1 already holds `Water`");
}

#[test]
fn mix_requires_every_slot() {
    let book = book();
    let mut session = MixingSession::new(level(), StationResolver::new(&book));
    session.place(Station::Cauldron, 0, "Water").expect("place");

    assert_eq!(
        session.mix(Station::Cauldron),
        Err(SessionError::SlotsNotFilled(Station::Cauldron))
    );
    assert_eq!(
        session.slots(Station::Cauldron).expect("slots")[0].as_deref(),
        Some("Water")
    );
}

#[test]
fn finishing_the_objective_completes_the_level() {
    let book = book();
    let mut session = MixingSession::new(level(), StationResolver::new(&book));

    session.place(Station::Mortar, 0, "Root").expect("place");
    let ground = session.mix(Station::Mortar).expect("mix");
    assert!(ground.is_success());
    assert!(!session.is_complete());
    assert!(session
        .slots(Station::Mortar)
        .expect("slots")
        .iter()
        .all(Option::is_none));

    session.place(Station::Cauldron, 0, "Water").expect("water");
    session.place(Station::Cauldron, 1, "Root Powder").expect("powder");
    session.place(Station::Cauldron, 2, "Glow").expect("glow");
    let brewed = session.mix(Station::Cauldron).expect("mix");

    assert_eq!(
        brewed.outcome,
        MixOutcome::Brewed {
            outputs: vec!["Greater Healing Potion".to_string()]
        }
    );
    assert!(session.is_complete());
    assert_eq!(session.tab(Category::Potion).len(), 1);
    assert_eq!(session.category_of("Greater Healing Potion"), Some(Category::Potion));

    let events: Vec<Event> = session.events.drain().collect();
    assert!(events.contains(&Event::LevelCompleted {
        level: 3,
        retries: 0,
    }));
    assert!(session.events.is_empty());
}

#[test]
fn failed_brew_keeps_inputs_consumed() {
    let book = book();
    let mut level = level();
    level.ingredients.push(ingredient("Pebble", Category::Solid, 1));
    let mut session = MixingSession::new(level, StationResolver::new(&book));

    session.place(Station::Cauldron, 0, "Water").expect("water");
    session.place(Station::Cauldron, 1, "Pebble").expect("pebble");
    session.place(Station::Cauldron, 2, "Glow").expect("glow");
    let report = session.mix(Station::Cauldron).expect("mix");

    assert_eq!(report.outcome, MixOutcome::NoRecipe);
    assert_eq!(report.message, "This looks more like a soup than a potion...");
    assert_eq!(session.inventory().count("Water", Category::Fluid), 1);
    assert_eq!(session.inventory().count("Pebble", Category::Solid), 0);
    assert_eq!(session.inventory().count("Glow", Category::Essence), 1);
    assert!(session
        .reservation(Station::Cauldron)
        .expect("reservation")
        .is_empty());
    assert!(!session.is_complete());
}

#[test]
fn retry_restores_the_seed() {
    let book = book();
    let mut session = MixingSession::new(level(), StationResolver::new(&book));
    session.place(Station::Mortar, 0, "Root").expect("place");
    session.mix(Station::Mortar).expect("mix");
    session.place(Station::Mortar, 0, "Root").expect("place");

    session.retry();

    assert_eq!(session.retries(), 1);
    assert_eq!(session.inventory().count("Root", Category::Solid), 2);
    assert_eq!(session.inventory().count("Root Powder", Category::Solid), 0);
    assert!(session
        .slots(Station::Mortar)
        .expect("slots")
        .iter()
        .all(Option::is_none));

    let mut progress = LevelProgress::new();
    assert!(progress.record_completion(session.level().level, session.retries()));
    assert_eq!(progress.best_retries(3), Some(1));
}
