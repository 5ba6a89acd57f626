/// Moments the audio layer may want to play something for.
///
/// The round queues these during a tick; the front end drains them
/// afterwards and never blocks the simulation on playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Opening,
    Chomp,
    PowerPelletEaten,
    GhostEaten,
    FruitEaten,
    ExtraLife,
    Death,
    RoundClear,
}
