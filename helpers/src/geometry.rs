use approx::ulps_eq;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub fn as_vector2d(&self) -> Vector2d {
        Vector2d {
            dx: self.x,
            dy: self.y,
        }
    }
    pub fn shift(&self, other: &Vector2d) -> Point2d {
        self.as_vector2d().add(other).as_point2d()
    }
    pub fn vector_to(&self, other: &Point2d) -> Vector2d {
        other.as_vector2d().sub(&self.as_vector2d())
    }
}

impl PartialEq for Point2d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.x, other.x) && ulps_eq!(self.y, other.y)
    }
}

#[derive(Debug, Clone)]
pub struct Vector2d {
    pub dx: f64,
    pub dy: f64,
}

impl Vector2d {
    pub fn as_point2d(&self) -> Point2d {
        Point2d {
            x: self.dx,
            y: self.dy,
        }
    }
    pub fn sub(&self, other: &Self) -> Vector2d {
        Vector2d {
            dx: self.dx - other.dx,
            dy: self.dy - other.dy,
        }
    }
    pub fn add(&self, other: &Self) -> Vector2d {
        Vector2d {
            dx: self.dx + other.dx,
            dy: self.dy + other.dy,
        }
    }
    pub fn mult(&self, k: f64) -> Vector2d {
        Vector2d {
            dx: self.dx * k,
            dy: self.dy * k,
        }
    }
    pub fn dot(&self, other: &Self) -> f64 {
        self.dx * other.dx + self.dy * other.dy
    }
    /// convenience function (strictly speaking, the cross product is not defined in a 2D space)
    pub fn cross(&self, other: &Self) -> f64 {
        self.dx * other.dy - self.dy * other.dx
    }
    pub fn abs(&self) -> f64 {
        (self.dx.powf(2.0) + self.dy.powf(2.0)).sqrt()
    }
    pub fn normal_vector(&self) -> Vector2d {
        Vector2d {
            dx: -self.dy,
            dy: self.dx,
        }
    }
    pub fn normalized(&self) -> Vector2d {
        self.mult(1.0 / self.abs())
    }
}

impl PartialEq for Vector2d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.dx, other.dx) && ulps_eq!(self.dy, other.dy)
    }
}
