use snake_game::run;

fn main() -> anyhow::Result<()> {
    pollster::block_on(run())
}
