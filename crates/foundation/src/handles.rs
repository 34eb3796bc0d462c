/// Generational handle to a drawable shape owned by a surface.
///
/// The surface hands these out when a region's shape is created; the core
/// never interprets them beyond equality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(u32, u32); // (index, generation)

impl ShapeHandle {
    pub fn new(index: u32, generation: u32) -> Self {
        ShapeHandle(index, generation)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    pub fn generation(self) -> u32 {
        self.1
    }
}
