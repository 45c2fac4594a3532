//! Behaviour-driven step definitions driving the CLI scenarios.

use super::*;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tourguide_core::NearbyAttraction;

#[derive(Debug, Default)]
struct CliWorld {
    argv: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl CliWorld {
    fn set_argv(&self, args: &[&str]) {
        let argv = std::iter::once("tourguide")
            .chain(args.iter().copied())
            .map(str::to_owned)
            .collect();
        self.argv.replace(argv);
    }

    fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }

    fn assert_success(&self) {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        if let Err(err) = result {
            panic!("expected success, found {err:?}");
        }
    }
}

#[fixture]
fn world() -> CliWorld {
    CliWorld::default()
}

#[given("a rewards invocation for 6 users")]
fn rewards_invocation(#[from(world)] world: &CliWorld) {
    world.set_argv(&["rewards", "--user-count", "6", "--pool-size", "2"]);
}

#[given("a nearby invocation at Disneyland")]
fn nearby_invocation(#[from(world)] world: &CliWorld) {
    world.set_argv(&[
        "nearby",
        "--latitude",
        "33.817595",
        "--longitude",
        "-117.922008",
    ]);
}

#[given("a nearby invocation without a latitude")]
fn nearby_without_latitude(#[from(world)] world: &CliWorld) {
    world.set_argv(&["nearby", "--longitude", "-117.922008"]);
}

#[given("a track invocation with a pool size of 0")]
fn track_with_zero_pool(#[from(world)] world: &CliWorld) {
    world.set_argv(&["track", "--user-count", "2", "--pool-size", "0"]);
}

#[when("I run the command")]
fn run_command(#[from(world)] world: &CliWorld) {
    let argv = world.argv.borrow().clone();
    let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| {
        let mut buffer = world.stdout.borrow_mut();
        match cli.command {
            Command::Rewards(args) => rewards::run_rewards(args, &mut *buffer),
            Command::Track(args) => track::run_track(args, &mut *buffer),
            Command::Nearby(args) => nearby::run_nearby(args, &mut *buffer),
        }
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and every user is rewarded")]
fn every_user_rewarded(#[from(world)] world: &CliWorld) {
    world.assert_success();
    let summary: serde_json::Value =
        serde_json::from_str(&world.stdout_text()).expect("output should be JSON");
    assert_eq!(summary["users"], 6);
    assert_eq!(summary["succeeded"], 6);
    assert_eq!(summary["failed"], 0);
}

#[then("the command succeeds and prints five attractions nearest first")]
fn five_attractions_printed(#[from(world)] world: &CliWorld) {
    world.assert_success();
    let nearby: Vec<NearbyAttraction> =
        serde_json::from_str(&world.stdout_text()).expect("output should be JSON attractions");
    assert_eq!(nearby.len(), 5);
    assert!(
        nearby
            .windows(2)
            .all(|pair| matches!(pair, [a, b] if a.distance_miles <= b.distance_miles))
    );
}

#[then("the command fails because the latitude is missing")]
fn latitude_missing(#[from(world)] world: &CliWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_LATITUDE),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the pool size is zero")]
fn pool_size_zero(#[from(world)] world: &CliWorld) {
    match &*world.error() {
        CliError::ZeroPoolSize { field } => assert_eq!(*field, ARG_POOL_SIZE),
        other => panic!("expected ZeroPoolSize, found {other:?}"),
    }
}

macro_rules! register_cli_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/cli_commands.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CliWorld) {
            let _ = world;
        }
    };
}

register_cli_scenario!(cli_rewards_batch, "rewarding a batch of simulated users");
register_cli_scenario!(cli_nearby_listing, "listing attractions near Disneyland");
register_cli_scenario!(
    cli_nearby_missing_latitude,
    "rejecting a nearby invocation without a latitude"
);
register_cli_scenario!(cli_zero_pool, "rejecting a zero-sized worker pool");
