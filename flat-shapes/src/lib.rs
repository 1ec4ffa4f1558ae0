//! The 2D shape layer: a narrow drawing capability over [`gl_scoped`], two
//! shape variants sharing a strip-geometry core, and the flat
//! registration-ordered list the frame loop walks once per frame.

pub mod colored;
pub mod geometry;
pub mod pan;
pub mod textured;

pub use colored::ColoredShape;
pub use textured::TexturedShape;

use gl_scoped::binding::GpuState;
use gl_scoped::error::Error;
use gl_scoped::linear::Vec2;

/// What every shape can do. Variants stay closed over this one dispatch
/// point; there is no deeper hierarchy.
pub trait Shape {
    /// Draws the shape as one triangle strip over its current vertices.
    fn draw(&self, gpu: &mut GpuState) -> Result<(), Error>;

    /// Translates every vertex by `delta` and re-uploads the buffer contents
    /// in place.
    fn translate(&mut self, delta: Vec2, gpu: &mut GpuState) -> Result<(), Error>;
}

/// Flat shape registry. Shapes draw in registration order; input-driven
/// mutation targets the most recently registered shape.
#[derive(Default)]
pub struct ShapeList {
    shapes: Vec<Box<dyn Shape>>,
}

impl ShapeList {
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    pub fn register(&mut self, shape: Box<dyn Shape>) {
        self.shapes.push(shape);
    }

    pub fn draw_all(&self, gpu: &mut GpuState) -> Result<(), Error> {
        for shape in &self.shapes {
            shape.draw(gpu)?;
        }
        Ok(())
    }

    pub fn last_mut(&mut self) -> Option<&mut (dyn Shape + '_)> {
        match self.shapes.last_mut() {
            Some(shape) => Some(shape.as_mut()),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct ProbeLog {
        drawn: RefCell<Vec<usize>>,
        moved: RefCell<Vec<(usize, Vec2)>>,
    }

    struct Probe {
        id: usize,
        log: Rc<ProbeLog>,
    }

    impl Shape for Probe {
        fn draw(&self, _gpu: &mut GpuState) -> Result<(), Error> {
            self.log.drawn.borrow_mut().push(self.id);
            Ok(())
        }

        fn translate(&mut self, delta: Vec2, _gpu: &mut GpuState) -> Result<(), Error> {
            self.log.moved.borrow_mut().push((self.id, delta));
            Ok(())
        }
    }

    fn probe(id: usize, log: &Rc<ProbeLog>) -> Box<Probe> {
        Box::new(Probe {
            id,
            log: Rc::clone(log),
        })
    }

    #[test]
    fn draws_in_registration_order() {
        let log = Rc::new(ProbeLog::default());
        let mut list = ShapeList::new();
        list.register(probe(0, &log));
        list.register(probe(1, &log));
        list.register(probe(2, &log));

        let mut gpu = GpuState::new();
        list.draw_all(&mut gpu).unwrap();
        assert_eq!(*log.drawn.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn last_mut_targets_the_most_recent_registration() {
        let log = Rc::new(ProbeLog::default());
        let mut list = ShapeList::new();
        list.register(probe(0, &log));
        list.register(probe(1, &log));

        let mut gpu = GpuState::new();
        list.last_mut()
            .unwrap()
            .translate(Vec2::new(0.1, 0.0), &mut gpu)
            .unwrap();

        assert_eq!(*log.moved.borrow(), vec![(1, Vec2::new(0.1, 0.0))]);

        // drawing still covers both, in order
        list.draw_all(&mut gpu).unwrap();
        assert_eq!(*log.drawn.borrow(), vec![0, 1]);
    }

    #[test]
    fn empty_list_draws_nothing() {
        let list = ShapeList::new();
        let mut gpu = GpuState::new();
        list.draw_all(&mut gpu).unwrap();
        assert!(list.is_empty());
    }
}
