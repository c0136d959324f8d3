pub mod controller;
pub mod learner;
pub mod lighter;
pub mod receiver;
pub mod sender;

pub use learner::{LearnableParam, MidiLearner};
pub use lighter::{LightEvent, MidiLighter};
pub use receiver::MidiReceiver;
pub use sender::MidiSender;
