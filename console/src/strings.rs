macro_rules! define_strings {
    (
        $($name:ident = $value:literal);*$(;)?
    ) => {
        $(
            pub const $name: &str = $value;
        )*
    };
}

pub mod run {
    define_strings! {
        CONFIG =
            "Path to a JSON run configuration. Fields left out fall back to \
            the defaults printed by the `config` subcommand. The built-in \
            default configuration is used when omitted.";
        DATA_DIR =
            "Directory that relative table paths of the configuration are \
            resolved against. Defaults to the current directory.";
        OUTPUT =
            "Path to the output JSON file. The report is written to stdout \
            when omitted.";
        PRETTY =
            "Pretty-print the output JSON.";
        SUMMARY =
            "Print a per-site ingestion summary and per-cell segment sizes \
            to stderr.";
    }
}

pub mod config {
    define_strings! {
        OUTPUT =
            "Path to write the default configuration to. Printed to stdout \
            when omitted.";
    }
}

pub mod utils {
    define_strings! {
        VERBOSE =
            "Log progress. Repeat for debug output (-vv).";
    }
}
