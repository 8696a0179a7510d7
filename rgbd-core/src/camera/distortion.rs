use thiserror::Error;

/// Internal distortion model used by the camera implementations
#[derive(Debug, Clone)]
pub(super) enum DistortionModel {
    None,
    BrownConrady {
        k1: f64,
        k2: f64,
        k3: f64,
        p1: f64,
        p2: f64,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistortionError {
    #[error("Undistortion Jacobian is singular")]
    SingularJacobian,

    #[error("Undistortion did not converge")]
    NonConvergent,
}

type Result<T> = std::result::Result<T, DistortionError>;

impl DistortionModel {
    /// Apply distortion to normalized image coordinates
    pub(super) fn distort(&self, x_norm: f64, y_norm: f64) -> (f64, f64) {
        match self {
            DistortionModel::None => (x_norm, y_norm),

            DistortionModel::BrownConrady { k1, k2, k3, p1, p2 } => {
                let r2 = x_norm * x_norm + y_norm * y_norm;
                let r4 = r2 * r2;
                let r6 = r4 * r2;

                let radial = 1.0 + k1 * r2 + k2 * r4 + k3 * r6;

                let x_dist = x_norm * radial
                    + 2.0 * p1 * x_norm * y_norm
                    + p2 * (r2 + 2.0 * x_norm * x_norm);

                let y_dist = y_norm * radial
                    + p1 * (r2 + 2.0 * y_norm * y_norm)
                    + 2.0 * p2 * x_norm * y_norm;

                (x_dist, y_dist)
            }
        }
    }

    /// Remove distortion from image coordinates using Newton-Raphson iteration
    pub(super) fn undistort(&self, x_dist: f64, y_dist: f64) -> Result<(f64, f64)> {
        match self {
            DistortionModel::None => Ok((x_dist, y_dist)),
            _ => {
                let mut x = x_dist;
                let mut y = y_dist;

                for _ in 0..10 {
                    let (fx, fy) = self.distort(x, y);
                    let rx = x_dist - fx;
                    let ry = y_dist - fy;

                    if rx.abs() < 1e-9 && ry.abs() < 1e-9 {
                        return Ok((x, y));
                    }

                    // Finite-difference Jacobian
                    let eps = 1e-6;
                    let (fx_x, fy_x) = self.distort(x + eps, y);
                    let (fx_y, fy_y) = self.distort(x, y + eps);

                    let j11 = (fx_x - fx) / eps;
                    let j21 = (fy_x - fy) / eps;
                    let j12 = (fx_y - fx) / eps;
                    let j22 = (fy_y - fy) / eps;

                    // Solve J * [dx, dy]^T = [rx, ry]^T
                    let det = j11 * j22 - j12 * j21;
                    if det.abs() < 1e-18 {
                        return Err(DistortionError::SingularJacobian);
                    }

                    let dx = (j22 * rx - j12 * ry) / det;
                    let dy = (-j21 * rx + j11 * ry) / det;

                    x += dx;
                    y += dy;
                }

                Err(DistortionError::NonConvergent)
            }
        }
    }
}
