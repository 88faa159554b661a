pub mod client;
pub mod utils;
pub mod block {
    pub mod adapter;
    pub mod model;
    pub mod store;
}
pub mod transaction {
    pub mod adapter;
    pub mod model;
    pub mod store;
}
pub mod name {
    pub mod model;
    pub mod store;
}
pub mod token {
    pub mod model;
    pub mod store;
}
pub mod activity {
    pub mod adapter;
    pub mod model;
    pub mod store;
}
pub mod cursor {
    pub mod model;
    pub mod store;
}
