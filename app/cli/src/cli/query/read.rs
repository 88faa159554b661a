use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Entity {
    Block,
    Transaction,
    Activity,
}
