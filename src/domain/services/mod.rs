//! Domain services - Pure business logic operations

mod florb_generator;

pub use florb_generator::{
    describe, intensity_for_rank, tags_for, validate_custom_colors, FlorbGenerator,
    GeneratedFlorb, GenerationOverrides, INTENSITY_EXPONENT, INTENSITY_FLOOR, PALETTE_DRAW_RANGE,
};
