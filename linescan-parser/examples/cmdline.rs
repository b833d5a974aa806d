use core::panic;

use linescan_parser::Commandline;

struct MyArgs {
    level: u32,
    jobs: Option<Option<u32>>,
    tags: Vec<String>,
}

fn main() {
    let text = r#"release publish -level=3 -tag=stable -tag="long term" -dry"#;

    let parsed = Commandline::parse(text).expect("must be parsed");

    let args = MyArgs {
        level: parsed
            .try_get_one("level")
            .expect("must be parsed")
            .flatten()
            .expect("must be present"),
        jobs: parsed.try_get_one("jobs").expect("must be parsed"),
        tags: parsed.get_all("tag").to_vec(),
    };

    if parsed.commands() != ["release", "publish"] {
        panic!("invalid commands");
    }

    if 3 != args.level {
        panic!("invalid level");
    }

    if args.jobs.is_some() {
        panic!("invalid jobs");
    }

    if args.tags != ["stable", "long term"] {
        panic!("invalid tags");
    }

    if !parsed.contains("dry") {
        panic!("missing dry");
    }
}
