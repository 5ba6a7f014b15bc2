//! Command definitions for the WFX preview

/// Step applied by speed and intensity commands
pub const PARAM_STEP: i32 = 8;

/// Commands that can be dispatched from input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // Effect selection
    NextEffect,
    PrevEffect,

    // Palette
    NextPalette,
    PrevPalette,
    ClearPalette,

    // Parameters, signed delta
    AdjustSpeed(i32),
    AdjustIntensity(i32),
    CycleColor,

    // Layout and playback
    ToggleMapper,
    TogglePause,
    Restart,

    ToggleHelp,
    Quit,
}
