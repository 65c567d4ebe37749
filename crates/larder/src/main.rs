//! larder - household kitchen inventory and cost ledger.

fn main() -> std::process::ExitCode {
    larder::cmd::main()
}
