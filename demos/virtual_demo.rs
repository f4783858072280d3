use threefinger::backends::virtual_input::VirtualSource;
use threefinger::gesture::{run, GestureMachine};
use threefinger::{PointerError, PointerSink};

/// Prints what a real pointer would have been told to do.
struct PrintPointer {
    at: (i32, i32),
}

impl PointerSink for PrintPointer {
    fn press_button(&mut self) -> Result<(), PointerError> {
        println!("(Virtual) Button pressed at {:?}", self.at);
        Ok(())
    }
    fn release_button(&mut self) -> Result<(), PointerError> {
        println!("(Virtual) Button released at {:?}", self.at);
        Ok(())
    }
    fn position(&mut self) -> Result<(i32, i32), PointerError> {
        Ok(self.at)
    }
    fn set_position(&mut self, x: i32, y: i32) -> Result<(), PointerError> {
        println!("(Virtual) Pointer {:?} -> ({}, {})", self.at, x, y);
        self.at = (x, y);
        Ok(())
    }
}

fn main() {
    // A virtual touchpad replaying a short three-finger drag
    let mut pad = VirtualSource::touchpad(1200, 800);
    pad.contact().contact().contact();
    for step in 0..5 {
        pad.x(100 + step * 20).y(100 + step * 10);
    }
    pad.lift().lift().lift();

    let mut pointer = PrintPointer { at: (640, 360) };
    let mut machine = GestureMachine::default();
    let summary = run(&mut pad, &mut pointer, &mut machine);
    println!("{summary:?}");
}
