use proptest::prelude::*;

use kates_core::tokenizer::tokenize;
use kates_core::{parse, Command, Registry, Runner, Script, StopReason};

/// Lines built from words the grammar cares about, with and without quoting.
fn control_line() -> impl Strategy<Value = String> {
    let word = prop_oneof![
        Just("if".to_string()),
        Just("else".to_string()),
        Just("endif".to_string()),
        Just("id".to_string()),
        Just("nop".to_string()),
        Just("1".to_string()),
        Just("0".to_string()),
        Just("''".to_string()),
    ];
    prop::collection::vec(word, 0..4).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn tokenizer_does_not_panic(line in "\\PC*") {
        let _ = tokenize(&line);
    }

    #[test]
    fn parse_is_deterministic(source in "\\PC*") {
        let first = parse(&source);
        let second = parse(&source);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn parse_yields_one_command_per_line(source in "[a-z $'\"\\n=]{0,64}") {
        if let Ok(script) = parse(&source) {
            prop_assert_eq!(script.len(), source.split('\n').count());
        }
    }

    #[test]
    fn rendered_scripts_parse_back(source in "[a-z $'\"\\\\\\t\\n=]{0,64}") {
        if let Ok(script) = parse(&source) {
            let rendered = script.to_string();
            prop_assert_eq!(parse(&rendered).unwrap(), script);
        }
    }

    #[test]
    fn blank_scripts_run_to_end(lines in prop::collection::vec("[ \\t]{0,4}", 1..8)) {
        let script = parse(&lines.join("\n")).unwrap();
        prop_assert!(script.iter().all(|c| *c == Command::nop()));

        let mut runner = Runner::new(Registry::new(), script);
        prop_assert_eq!(runner.run().unwrap(), StopReason::End);
        prop_assert!(runner.variables().is_empty());
    }

    #[test]
    fn skip_stack_keeps_bottom_frame(lines in prop::collection::vec(control_line(), 0..24)) {
        let commands: Vec<Command> = lines
            .iter()
            .filter_map(|line| parse(line).ok())
            .flat_map(|script| script.commands().to_vec())
            .collect();
        let mut runner = Runner::new(Registry::new(), Script::new(commands));

        loop {
            match runner.run() {
                Ok(_) => break,
                Err(_) => {
                    prop_assert!(runner.skip_depth() >= 1);
                    if runner.is_finished() {
                        break;
                    }
                }
            }
            prop_assert!(runner.skip_depth() >= 1);
        }
        prop_assert!(runner.skip_depth() >= 1);
    }
}
