use meshbench::entry;
use meshbench::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
