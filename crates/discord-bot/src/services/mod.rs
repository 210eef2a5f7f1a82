//! Business flows that combine domain rules with storage. Everything here is
//! generic over the repository traits so it can be tested with a mock store.

pub mod economy;
pub mod profile;
pub mod reset;
pub mod rewards;
pub mod rolls;
