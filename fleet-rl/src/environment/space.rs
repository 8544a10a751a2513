use rand::Rng;

pub trait Space {
    type Element;

    fn sample<R: Rng>(&self, rng: &mut R) -> Self::Element;

    fn contains(&self, element: &Self::Element) -> bool;
}

/// The integers `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discrete {
    pub n: usize,
}

impl Discrete {
    pub fn new(n: usize) -> Self {
        Discrete { n }
    }
}

impl Space for Discrete {
    type Element = usize;

    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.n)
    }

    fn contains(&self, element: &usize) -> bool {
        *element < self.n
    }
}

/// A box of real values with a fixed shape and uniform bounds, flattened in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpace {
    pub shape: Vec<usize>,
    pub low: f32,
    pub high: f32,
}

impl BoxSpace {
    pub fn new(shape: Vec<usize>, low: f32, high: f32) -> Self {
        BoxSpace { shape, low, high }
    }

    pub fn num_elements(&self) -> usize {
        self.shape.iter().product()
    }
}

impl Space for BoxSpace {
    type Element = Vec<f32>;

    fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f32> {
        (0..self.num_elements())
            .map(|_| rng.gen_range(self.low..=self.high))
            .collect()
    }

    fn contains(&self, element: &Vec<f32>) -> bool {
        element.len() == self.num_elements()
            && element.iter().all(|x| self.low <= *x && *x <= self.high)
    }
}
