//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use std::env;
    use std::fs;

    use assert_cmd::Command;

    fn absoluter() -> Command {
        let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
        cmd.env_remove("ABSOLUTER_REQUIRED_HEADER")
            .env_remove("ABSOLUTER_TIMEOUT")
            .env("NO_COLOR", "1");
        cmd
    }

    #[test]
    fn print_help_information() {
        let assert = absoluter().arg("-h").assert().success();
        let stdout = String::from_utf8_lossy(&assert.get_output().stdout);

        assert!(stdout.contains("--base-url"));
        assert!(stdout.contains("--no-header-gate"));
    }

    #[test]
    fn rewrite_stdin() {
        absoluter()
            .args(["--base-url", "http://a.com/dir/page.html", "-"])
            .write_stdin(r#"<a href="x.html">x</a><img src="/i.png">"#)
            .assert()
            .success()
            .stdout(r#"<a href="http://a.com/dir/x.html">x</a><img src="http://a.com/i.png">"#);
    }

    #[test]
    fn rewrite_stdin_normalized() {
        absoluter()
            .args(["--normalize", "-b", "http://a.com/dir/", "-"])
            .write_stdin("<p><img src=i.png>")
            .assert()
            .success()
            .stdout(r#"<head></head><body><p><img src="http://a.com/dir/i.png"></p></body>"#);
    }

    #[test]
    fn rewrite_local_file_into_output_file() {
        let dir = env::temp_dir();
        let input = dir.join(format!("absoluter-input-{}.html", std::process::id()));
        let output = dir.join(format!("absoluter-output-{}.html", std::process::id()));
        fs::write(&input, r#"<div style="background:url(bg.png)"></div>"#).unwrap();

        absoluter()
            .args(["-b", "http://a.com/"])
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .assert()
            .success()
            .stdout("");

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            r#"<div style="background:url(http://a.com/bg.png)"></div>"#
        );

        fs::remove_file(input).unwrap();
        fs::remove_file(output).unwrap();
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use assert_cmd::assert::Assert;
    use assert_cmd::Command;

    fn absoluter() -> Command {
        let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
        cmd.env("NO_COLOR", "1");
        cmd
    }

    fn stderr_of(assert: &Assert) -> String {
        String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
    }

    #[test]
    fn invalid_base_url() {
        let assert = absoluter()
            .args(["--base-url", "not a url", "-"])
            .write_stdin("<a href=x>")
            .assert()
            .failure()
            .code(1)
            .stdout("");

        assert!(stderr_of(&assert).contains("is not an absolute URL"));
    }

    #[test]
    fn missing_input_file() {
        let assert = absoluter()
            .args(["-b", "http://a.com/", "/nonexistent/absoluter/input.html"])
            .assert()
            .failure();

        assert!(stderr_of(&assert).contains("could not read"));
    }

    #[test]
    fn target_is_not_a_url() {
        let assert = absoluter().arg("page.html").assert().failure();

        assert!(stderr_of(&assert).contains("is not a URL"));
    }

    #[test]
    fn normalize_requires_base_url() {
        absoluter()
            .args(["--normalize", "http://a.com/"])
            .assert()
            .failure()
            .code(2);
    }
}
