#[cfg(test)]
mod tests {
    use assert_cmd::Command;

    fn shell(db_name: &std::path::Path) -> Command {
        let bin_name = env!("CARGO_PKG_NAME");
        let mut cmd = Command::cargo_bin(bin_name).unwrap();
        cmd.arg(db_name)
            .env_remove("PAGINATE_CONFIG")
            .env("PAGINATE_PAGE_SIZE", "2")
            .env("RUST_LOG", "off");
        cmd
    }

    #[test]
    fn main_test() {
        let dir = tempfile::tempdir().unwrap();
        let db_name = dir.path().join("test.db");

        // first create database
        let mut cmd = shell(&db_name);
        let session = &mut cmd;
        session.assert().stdout("db > ");
        session
            .write_stdin("INSERT 1 alice alice@example.com 30")
            .assert()
            .stdout("db > Executed.\ndb > ");

        session
            .write_stdin("SELECT")
            .assert()
            .stdout("db > (1, alice, alice@example.com, 30)\nExecuted.\ndb > ");
        session
            .write_stdin("INSERT 2 bob bob@example.com 22")
            .assert()
            .stdout("db > Executed.\ndb > ");
        session.write_stdin(".exit").assert().success().stdout("db > Bye~\n");

        // test database persistence
        let mut cmd = shell(&db_name);
        let session = &mut cmd;
        session
            .write_stdin("select")
            .assert()
            .stdout(
                "db > (1, alice, alice@example.com, 30)\n\
                 (2, bob, bob@example.com, 22)\n\
                 Executed.\n\
                 db > ",
            );
        session
            .write_stdin("insert 3 charlie charlie@example.com 45")
            .assert()
            .stdout("db > Executed.\ndb > ");
        session
            .write_stdin(".paginate")
            .assert()
            .stdout(
                "db > -- page 1 (offset 0)\n\
                 (1, alice, alice@example.com, 30)\n\
                 (2, bob, bob@example.com, 22)\n\
                 -- page 2 (offset 2)\n\
                 (3, charlie, charlie@example.com, 45)\n\
                 db > ",
            );
    }

    #[test]
    fn multiple_commands_in_one_session() {
        let dir = tempfile::tempdir().unwrap();
        let db_name = dir.path().join("multi.db");

        shell(&db_name)
            .write_stdin(
                "insert 1 alice alice@example.com 30\n\
                 insert 2 bob bob@example.com 22\n\
                 insert 3 charlie charlie@example.com 45\n\
                 insert 4 diana diana@example.com 55\n\
                 .avg\n\
                 .batch\n\
                 .exit\n",
            )
            .assert()
            .success()
            .stdout(
                "db > Executed.\n\
                 db > Executed.\n\
                 db > Executed.\n\
                 db > Executed.\n\
                 db > Average age of users: 38.0\n\
                 db > (1, alice, alice@example.com, 30)\n\
                 (3, charlie, charlie@example.com, 45)\n\
                 (4, diana, diana@example.com, 55)\n\
                 db > Bye~\n",
            );
    }

    #[test]
    fn seed_then_reject_duplicate_key() {
        let dir = tempfile::tempdir().unwrap();
        let db_name = dir.path().join("seeded.db");
        let csv = dir.path().join("user_data.csv");
        std::fs::write(
            &csv,
            "user_id,name,email,age\n\
             u1,alice,alice@example.com,30\n\
             u2,bob,bob@example.com,22\n",
        )
        .unwrap();

        shell(&db_name)
            .write_stdin(format!(
                ".seed {}\n\
                 insert u1 carol carol@example.com 41\n\
                 select\n",
                csv.display()
            ))
            .assert()
            .success()
            .stdout(
                "db > Seeded 2 rows, skipped 0 existing.\n\
                 db > Error: Duplicate key.\n\
                 db > (u1, alice, alice@example.com, 30)\n\
                 (u2, bob, bob@example.com, 22)\n\
                 Executed.\n\
                 db > ",
            );
    }

    #[test]
    fn rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let db_name = dir.path().join("bad.db");
        let long_name = "a".repeat(256);

        shell(&db_name)
            .write_stdin(format!(
                "insert 1 {long_name} a@example.com 3\n\
                 insert -\n\
                 insert 1 a a@example.com -3\n\
                 .tables\n"
            ))
            .assert()
            .success()
            .stdout(
                "db > String is too long.\n\
                 db > Syntax error. Could not parse statement.\n\
                 db > Age must be positive.\n\
                 db > Unrecognized command .tables\n\
                 db > ",
            );
    }
}
