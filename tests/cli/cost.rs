use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

#[test]
fn test_cost_on_file_with_no_imports() -> Result<()> {
    let test = CliTest::with_file("index.js", "console.log('hello');\n")?;

    assert_cmd_snapshot!(test.cost_command("index.js"));

    Ok(())
}

#[test]
fn test_cost_drops_unresolvable_import_silently() -> Result<()> {
    // No node_modules directory exists anywhere above this file, so the
    // resolver can't find `left-pad` and the import is dropped rather than
    // reported as an error.
    let test = CliTest::with_file("index.js", "import pad from 'left-pad';\n")?;

    assert_cmd_snapshot!(test.cost_command("index.js"));

    Ok(())
}

#[test]
fn test_cost_on_missing_file_fails() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.cost_command("does-not-exist.js"));

    Ok(())
}

#[test]
fn test_cost_rejects_zero_max_call_time() -> Result<()> {
    let test = CliTest::with_file("index.js", "console.log('hello');\n")?;

    assert_cmd_snapshot!(
        test.command()
            .arg("cost")
            .arg("index.js")
            .arg("--max-call-time")
            .arg("0")
    );

    Ok(())
}

#[test]
fn test_cost_rejects_garbage_max_call_time() -> Result<()> {
    let test = CliTest::with_file("index.js", "console.log('hello');\n")?;

    assert_cmd_snapshot!(
        test.command()
            .arg("cost")
            .arg("index.js")
            .arg("--max-call-time")
            .arg("soon")
    );

    Ok(())
}

#[test]
fn test_cost_accepts_language_override() -> Result<()> {
    // Written with a `.txt` extension so inference would yield `Unknown`;
    // `--language` forces JavaScript parsing instead.
    let test = CliTest::with_file("index.txt", "console.log('hello');\n")?;

    assert_cmd_snapshot!(
        test.command()
            .arg("cost")
            .arg("index.txt")
            .arg("--language")
            .arg("javascript")
    );

    Ok(())
}
